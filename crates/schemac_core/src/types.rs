//! Type references.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A possibly wrapped reference to a named type.
///
/// Both SDL bracket/bang syntax and the introspection `ofType` chain are
/// decoded into this one shape, so `[[Int!]]!` is always
/// `NonNull(List(List(NonNull(Named("Int")))))`.
///
/// The leaf is generic: raw declarations carry the GraphQL type name, the
/// compiled model carries a resolved reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef<N = String> {
    /// A named type.
    Named(N),
    /// `[T]`
    List(Box<TypeRef<N>>),
    /// `T!`
    NonNull(Box<TypeRef<N>>),
}

impl<N> TypeRef<N> {
    pub fn named(name: impl Into<N>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(inner: TypeRef<N>) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wraps `inner` in `NonNull`, refusing to wrap an already non-null type.
    #[must_use]
    pub fn try_non_null(inner: TypeRef<N>) -> Option<Self> {
        if inner.is_non_null() {
            None
        } else {
            Some(Self::NonNull(Box::new(inner)))
        }
    }

    /// Returns true if the outermost wrapper is `NonNull`.
    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns true if a list appears anywhere in the wrapping.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }

    /// Returns the innermost named type.
    #[must_use]
    pub fn base(&self) -> &N {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base(),
        }
    }

    /// Returns the number of list levels.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        match self {
            Self::Named(_) => 0,
            Self::List(inner) => 1 + inner.list_depth(),
            Self::NonNull(inner) => inner.list_depth(),
        }
    }

    /// Rebuilds the same wrapping around a converted leaf.
    pub fn try_map<M, E>(&self, f: &mut impl FnMut(&N) -> Result<M, E>) -> Result<TypeRef<M>, E> {
        Ok(match self {
            Self::Named(name) => TypeRef::Named(f(name)?),
            Self::List(inner) => TypeRef::List(Box::new(inner.try_map(f)?)),
            Self::NonNull(inner) => TypeRef::NonNull(Box::new(inner.try_map(f)?)),
        })
    }
}

impl<N: std::fmt::Display> std::fmt::Display for TypeRef<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> TypeRef {
        let int = TypeRef::try_non_null(TypeRef::named("Int")).unwrap();
        let inner = TypeRef::try_non_null(TypeRef::list(int)).unwrap();
        TypeRef::try_non_null(TypeRef::list(inner)).unwrap()
    }

    #[test]
    fn test_display() {
        assert_eq!(nested().to_string(), "[[Int!]!]!");
        assert_eq!(TypeRef::<String>::named("User").to_string(), "User");
    }

    #[test]
    fn test_no_double_non_null() {
        let non_null = TypeRef::try_non_null(TypeRef::<String>::named("ID")).unwrap();
        assert!(TypeRef::try_non_null(non_null).is_none());
    }

    #[test]
    fn test_base_and_depth() {
        let ty = nested();
        assert_eq!(ty.base(), "Int");
        assert_eq!(ty.list_depth(), 2);
        assert!(ty.is_list());
        assert!(ty.is_non_null());
    }

    #[test]
    fn test_try_map_preserves_wrapping() {
        let mapped: TypeRef<usize> = nested()
            .try_map(&mut |name: &String| Ok::<_, ()>(name.len()))
            .unwrap();
        assert_eq!(mapped.to_string(), "[[3!]!]!");
    }
}
