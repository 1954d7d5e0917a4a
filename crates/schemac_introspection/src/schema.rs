//! Serde shapes of the introspection `__schema` object.
//!
//! Only the parts the compiler reads are modelled. Descriptions, deprecation
//! data and directive arguments are ignored; unknown keys are accepted.

use serde::Deserialize;

/// The `__schema` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    /// Required; `None` only so a missing root is reported at its own path.
    pub query_type: Option<RootType>,
    pub mutation_type: Option<RootType>,
    pub subscription_type: Option<RootType>,
    pub types: Vec<FullType>,
    #[serde(default)]
    pub directives: Vec<DirectiveDef>,
}

/// A `{ name }` root operation reference.
#[derive(Debug, Clone, Deserialize)]
pub struct RootType {
    pub name: String,
}

/// An entry of `__schema.types`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    pub fields: Option<Vec<Field>>,
    pub input_fields: Option<Vec<InputValue>>,
    pub enum_values: Option<Vec<EnumValue>>,
    pub interfaces: Option<Vec<TypeRefJson>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRefJson,
}

/// An argument or input object field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRefJson,
    /// The default value as GraphQL literal text.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValue {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectiveDef {
    pub name: String,
}

/// One link of a `{ kind, name, ofType }` chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRefJson {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeRefJson>>,
}

/// `__TypeKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }

    /// Returns true for `LIST` and `NON_NULL`.
    #[must_use]
    pub const fn is_wrapper(self) -> bool {
        matches!(self, Self::List | Self::NonNull)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
