//! Raw type declarations.
//!
//! This is the common output of the SDL parser and the introspection
//! decoder. Both encodings of the same schema produce structurally equal
//! declarations (origins aside).

use crate::error::{CompileError, Result};
use crate::origin::Origin;
use crate::types::TypeRef;
use crate::value::Value;

/// What to do with constructs outside the supported core
/// (interfaces, unions, directive definitions, extensions, non-core directives).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Record the construct in [`RawSchema::skipped`] and continue.
    #[default]
    Skip,
    /// Fail with [`CompileError::UnsupportedConstruct`].
    Reject,
}

/// An unsupported construct kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Interface,
    Union,
    DirectiveDefinition,
    Extension,
    Implements,
    Directive,
}

impl Construct {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Union => "union",
            Self::DirectiveDefinition => "directive definition",
            Self::Extension => "type extension",
            Self::Implements => "implements clause",
            Self::Directive => "directive",
        }
    }

    /// Returns true if skipping this construct removes a named type.
    #[must_use]
    pub const fn declares_type(self) -> bool {
        matches!(self, Self::Interface | Self::Union)
    }
}

impl std::fmt::Display for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A construct that was recognized but not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub construct: Construct,
    pub name: String,
    pub origin: Origin,
}

/// Declared root operation type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootNames {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// All raw declarations of one schema, in source order.
#[derive(Debug, Clone)]
pub struct RawSchema {
    pub declarations: Vec<RawDecl>,
    pub roots: RootNames,
    /// Where the root operation types are declared.
    pub roots_origin: Origin,
    pub skipped: Vec<Skipped>,
}

impl RawSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(roots_origin: Origin) -> Self {
        Self {
            declarations: Vec::new(),
            roots: RootNames::default(),
            roots_origin,
            skipped: Vec::new(),
        }
    }

    /// Finds a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawDecl> {
        self.declarations.iter().find(|decl| decl.name == name)
    }

    /// Applies `policy` to an unsupported construct.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnsupportedConstruct`] under [`UnsupportedPolicy::Reject`].
    pub fn unsupported(
        &mut self,
        policy: UnsupportedPolicy,
        construct: Construct,
        name: impl Into<String>,
        origin: Origin,
    ) -> Result<()> {
        let name = name.into();
        match policy {
            UnsupportedPolicy::Reject => Err(CompileError::UnsupportedConstruct {
                construct,
                name,
                origin,
            }),
            UnsupportedPolicy::Skip => {
                self.skipped.push(Skipped {
                    construct,
                    name,
                    origin,
                });
                Ok(())
            }
        }
    }

    /// Names of types removed by skipping.
    pub fn skipped_types(&self) -> impl Iterator<Item = &str> {
        self.skipped
            .iter()
            .filter(|s| s.construct.declares_type())
            .map(|s| s.name.as_str())
    }
}

/// A named top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDecl {
    pub name: String,
    pub kind: RawDeclKind,
    pub origin: Origin,
}

/// The kind-specific body of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDeclKind {
    Object { fields: Vec<RawField> },
    Input { fields: Vec<RawInputValue> },
    Enum { values: Vec<String> },
    Scalar,
}

impl RawDeclKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object { .. } => "type",
            Self::Input { .. } => "input",
            Self::Enum { .. } => "enum",
            Self::Scalar => "scalar",
        }
    }
}

/// An output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub ty: TypeRef,
    pub args: Vec<RawInputValue>,
    pub origin: Origin,
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputValue {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub origin: Origin,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin::json("__schema.types[0]")
    }

    #[test]
    fn test_skip_policy_records() {
        let mut schema = RawSchema::new(origin());
        schema
            .unsupported(UnsupportedPolicy::Skip, Construct::Union, "SearchResult", origin())
            .unwrap();
        schema
            .unsupported(UnsupportedPolicy::Skip, Construct::Directive, "key", origin())
            .unwrap();
        assert_eq!(schema.skipped.len(), 2);
        assert_eq!(schema.skipped_types().collect::<Vec<_>>(), vec!["SearchResult"]);
    }

    #[test]
    fn test_reject_policy_fails() {
        let mut schema = RawSchema::new(origin());
        let err = schema
            .unsupported(UnsupportedPolicy::Reject, Construct::Interface, "Node", origin())
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnsupportedConstruct { construct: Construct::Interface, ref name, .. } if name == "Node"
        ));
        assert!(schema.skipped.is_empty());
    }
}
