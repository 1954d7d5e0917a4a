//! Scalar and name mapping.
//!
//! Scalar resolution goes override, then the built-in table, then a fallback
//! (or the literal name). Identifiers are derived by a casing transform only;
//! GraphQL names are already identifier-safe.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use schemac_core::{CompileError, Result};
use serde::Serialize;

/// The target type a GraphQL scalar maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScalarTarget {
    /// Target type name.
    pub name: String,
    /// Whether the target is a non-null value type (written `Int!`).
    pub value_type: bool,
}

impl ScalarTarget {
    /// Creates a reference-type target.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: false,
        }
    }

    /// Parses `Name` or `Name!`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.strip_suffix('!') {
            Some(name) => Self {
                name: name.to_string(),
                value_type: true,
            },
            None => Self::new(text),
        }
    }
}

impl std::fmt::Display for ScalarTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if self.value_type {
            f.write_str("!")?;
        }
        Ok(())
    }
}

/// Default targets for scalars.
#[derive(Debug, Clone)]
pub struct ScalarTable {
    entries: FxHashMap<String, ScalarTarget>,
}

impl Default for ScalarTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScalarTable {
    /// The built-in scalar table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty()
            .with("String", "String")
            .with("ID", "ID")
            .with("Int", "Int!")
            .with("Float", "Float!")
            .with("Boolean", "Boolean")
    }

    /// A table without entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, target: &str) -> Self {
        self.insert(name, ScalarTarget::parse(target));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, target: ScalarTarget) {
        self.entries.insert(name.into(), target);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScalarTarget> {
        self.entries.get(name)
    }
}

/// User-supplied `GraphQLName=Target` overrides, in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalarOverrides {
    entries: IndexMap<String, ScalarTarget>,
}

impl ScalarOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a delimited override string such as `ID=Guid,DateTime=Instant!`.
    ///
    /// Pairs are split on `,` and each pair on its first `=`. Targets that
    /// themselves contain `,` or `=` cannot be expressed. Empty segments are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::InvalidOverride`] for a segment without `=` or
    /// with an empty side.
    pub fn parse(text: &str) -> Result<Self> {
        let mut overrides = Self::new();
        for segment in text.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let invalid = |reason: &str| CompileError::InvalidOverride {
                pair: segment.to_string(),
                reason: reason.to_string(),
            };
            let (name, target) = segment.split_once('=').ok_or_else(|| invalid("missing `=`"))?;
            let (name, target) = (name.trim(), target.trim());
            if name.is_empty() {
                return Err(invalid("empty GraphQL type name"));
            }
            if target.is_empty() || target == "!" {
                return Err(invalid("empty target type"));
            }

            overrides.insert(name, ScalarTarget::parse(target));
        }
        Ok(overrides)
    }

    /// Adds an override. A later override for the same name wins.
    pub fn insert(&mut self, name: impl Into<String>, target: ScalarTarget) {
        self.entries.insert(name.into(), target);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScalarTarget> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarTarget)> {
        self.entries.iter().map(|(name, target)| (name.as_str(), target))
    }
}

impl std::str::FromStr for ScalarOverrides {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Casing applied when deriving an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentStyle {
    /// Types and fields: initial letter upper-cased.
    TypeMember,
    /// Arguments: initial letter lower-cased.
    LocalVariable,
}

/// Derives a target identifier from a GraphQL name.
#[must_use]
pub fn to_identifier(name: &str, style: IdentStyle) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut identifier = String::with_capacity(name.len());
    match style {
        IdentStyle::TypeMember => identifier.extend(first.to_uppercase()),
        IdentStyle::LocalVariable => identifier.extend(first.to_lowercase()),
    }
    identifier.push_str(chars.as_str());
    identifier
}

/// Scalar resolution for one compilation.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    overrides: &'a ScalarOverrides,
    table: &'a ScalarTable,
    fallback: &'a ScalarTarget,
}

impl<'a> Mapper<'a> {
    #[must_use]
    pub fn new(
        overrides: &'a ScalarOverrides,
        table: &'a ScalarTable,
        fallback: &'a ScalarTarget,
    ) -> Self {
        Self {
            overrides,
            table,
            fallback,
        }
    }

    /// Returns the user override for `name`, if any.
    #[must_use]
    pub fn override_for(&self, name: &str) -> Option<&'a ScalarTarget> {
        self.overrides.get(name)
    }

    /// Resolves a scalar: override, then table, then the name itself.
    #[must_use]
    pub fn resolve_scalar(&self, name: &str) -> ScalarTarget {
        self.override_for(name)
            .or_else(|| self.table.get(name))
            .cloned()
            .unwrap_or_else(|| ScalarTarget::new(name))
    }

    /// Resolves a declared custom scalar: override, then table, then the
    /// configured fallback.
    #[must_use]
    pub fn resolve_custom_scalar(&self, name: &str) -> ScalarTarget {
        self.override_for(name)
            .or_else(|| self.table.get(name))
            .unwrap_or(self.fallback)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(text: &str) -> ScalarOverrides {
        match ScalarOverrides::parse(text) {
            Ok(overrides) => overrides,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_scalar_target_parse() {
        assert_eq!(
            ScalarTarget::parse("Int!"),
            ScalarTarget {
                name: "Int".into(),
                value_type: true
            }
        );
        assert_eq!(ScalarTarget::parse("Guid"), ScalarTarget::new("Guid"));
        assert_eq!(ScalarTarget::parse("Float!").to_string(), "Float!");
    }

    #[test]
    fn test_builtin_table() {
        let table = ScalarTable::builtin();
        assert_eq!(table.get("String"), Some(&ScalarTarget::new("String")));
        assert_eq!(table.get("ID"), Some(&ScalarTarget::new("ID")));
        assert_eq!(table.get("Int").map(ToString::to_string).as_deref(), Some("Int!"));
        assert_eq!(table.get("Float").map(ToString::to_string).as_deref(), Some("Float!"));
        assert_eq!(table.get("Boolean"), Some(&ScalarTarget::new("Boolean")));
        assert_eq!(table.get("DateTime"), None);
    }

    #[test]
    fn test_parse_overrides() {
        let parsed = overrides(" ID = Guid ,, DateTime=Instant! ,");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("ID"), Some(&ScalarTarget::new("Guid")));
        assert_eq!(
            parsed.get("DateTime").map(ToString::to_string).as_deref(),
            Some("Instant!")
        );
        let order: Vec<_> = parsed.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["ID", "DateTime"]);
    }

    #[test]
    fn test_parse_splits_on_first_eq() {
        let parsed = overrides("Json=Map<K=V>");
        assert_eq!(parsed.get("Json"), Some(&ScalarTarget::new("Map<K=V>")));
    }

    #[test]
    fn test_parse_overrides_empty() {
        assert!(overrides("").is_empty());
        assert!(overrides(" , ").is_empty());
    }

    #[test]
    fn test_invalid_overrides() {
        for (text, pair, reason) in [
            ("ID", "ID", "missing `=`"),
            ("ID=Guid,=Foo", "=Foo", "empty GraphQL type name"),
            ("ID= ", "ID=", "empty target type"),
            ("ID=!", "ID=!", "empty target type"),
        ] {
            match ScalarOverrides::parse(text) {
                Err(CompileError::InvalidOverride { pair: p, reason: r }) => {
                    assert_eq!((p.as_str(), r.as_str()), (pair, reason), "{text}");
                }
                other => panic!("expected invalid override for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_str() {
        let parsed: ScalarOverrides = "ID=Guid".parse().unwrap();
        assert_eq!(parsed.get("ID"), Some(&ScalarTarget::new("Guid")));
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("user", IdentStyle::TypeMember), "User");
        assert_eq!(to_identifier("createdAt", IdentStyle::TypeMember), "CreatedAt");
        assert_eq!(to_identifier("First", IdentStyle::LocalVariable), "first");
        assert_eq!(to_identifier("_id", IdentStyle::TypeMember), "_id");
        assert_eq!(to_identifier("", IdentStyle::LocalVariable), "");
    }

    #[test]
    fn test_resolution_precedence() {
        let overrides = overrides("ID=Guid,Int=Long!");
        let table = ScalarTable::builtin();
        let fallback = ScalarTarget::new("string");
        let mapper = Mapper::new(&overrides, &table, &fallback);

        assert_eq!(mapper.resolve_scalar("ID"), ScalarTarget::new("Guid"));
        assert_eq!(mapper.resolve_scalar("Int").to_string(), "Long!");
        assert_eq!(mapper.resolve_scalar("String"), ScalarTarget::new("String"));
        assert_eq!(mapper.resolve_scalar("Widget"), ScalarTarget::new("Widget"));
        assert_eq!(mapper.resolve_custom_scalar("DateTime"), fallback);
    }

    #[test]
    fn test_custom_table() {
        let overrides = ScalarOverrides::new();
        let table = ScalarTable::empty().with("DateTime", "Instant!");
        let fallback = ScalarTarget::new("String");
        let mapper = Mapper::new(&overrides, &table, &fallback);

        assert_eq!(mapper.resolve_custom_scalar("DateTime").to_string(), "Instant!");
        assert_eq!(mapper.resolve_scalar("Int"), ScalarTarget::new("Int"));
    }
}
