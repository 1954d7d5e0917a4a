//! The compiled type model.

use crate::mapper::ScalarTarget;
use indexmap::{IndexMap, IndexSet};
use schemac_core::{is_builtin_scalar, TypeRef, Value};
use serde::Serialize;

/// What a named reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedKind {
    Scalar,
    Object,
    Input,
    Enum,
}

/// A resolved type reference leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamedRef {
    /// The GraphQL type name.
    pub name: String,
    pub kind: NamedKind,
    /// The target type name.
    pub target: String,
    /// Whether the target is a non-null value type.
    pub value_type: bool,
}

impl NamedRef {
    /// A reference to a scalar with a resolved target.
    pub fn scalar(name: impl Into<String>, target: ScalarTarget) -> Self {
        Self {
            name: name.into(),
            kind: NamedKind::Scalar,
            target: target.name,
            value_type: target.value_type,
        }
    }
}

impl std::fmt::Display for NamedRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A type reference in the model.
pub type ModelTypeRef = TypeRef<NamedRef>;

/// An output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub identifier: String,
    pub ty: ModelTypeRef,
    pub args: Vec<ArgDef>,
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputValueDef {
    pub name: String,
    pub identifier: String,
    pub ty: ModelTypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// A field argument.
pub type ArgDef = InputValueDef;

/// An object type, including the Query and Mutation roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectTypeDef {
    pub name: String,
    pub identifier: String,
    pub fields: Vec<FieldDef>,
}

impl ObjectTypeDef {
    /// Creates an object type without fields.
    pub fn empty(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// An input object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputTypeDef {
    pub name: String,
    pub identifier: String,
    pub fields: Vec<InputValueDef>,
}

/// An enum type. Values compare as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumTypeDef {
    pub name: String,
    pub identifier: String,
    pub values: IndexSet<String>,
}

/// A declared custom scalar and its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarDef {
    pub name: String,
    pub target: ScalarTarget,
}

/// The compiled schema.
///
/// Maps keep declaration order but compare order-insensitively, so models
/// built from SDL and from introspection (which orders types differently)
/// are equal when they describe the same schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeModel {
    /// Object types other than the roots.
    pub types: IndexMap<String, ObjectTypeDef>,
    pub inputs: IndexMap<String, InputTypeDef>,
    pub enums: IndexMap<String, EnumTypeDef>,
    pub scalars: IndexMap<String, ScalarDef>,
    pub query: ObjectTypeDef,
    /// Empty when the schema declares no mutation root.
    pub mutation: ObjectTypeDef,
}

impl TypeModel {
    /// Returns all object types, roots first.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectTypeDef> {
        [&self.query, &self.mutation]
            .into_iter()
            .chain(self.types.values())
    }

    /// Returns true if `name` resolves to a type of this model.
    #[must_use]
    pub fn contains_type(&self, name: &str) -> bool {
        is_builtin_scalar(name)
            || self.types.contains_key(name)
            || self.inputs.contains_key(name)
            || self.enums.contains_key(name)
            || self.scalars.contains_key(name)
            || self.query.name == name
            || self.mutation.name == name
    }

    /// Returns every type reference of the model with a description of
    /// where it appears.
    #[must_use]
    pub fn references(&self) -> Vec<(String, &ModelTypeRef)> {
        let mut refs = Vec::new();
        for object in self.objects() {
            for field in &object.fields {
                refs.push((format!("{}.{}", object.name, field.name), &field.ty));
                for arg in &field.args {
                    refs.push((format!("{}.{}({})", object.name, field.name, arg.name), &arg.ty));
                }
            }
        }
        for input in self.inputs.values() {
            for field in &input.fields {
                refs.push((format!("{}.{}", input.name, field.name), &field.ty));
            }
        }
        refs
    }
}

impl std::fmt::Display for InputValueDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;
        if let Some(value) = &self.default_value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for FieldDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")?;
        }
        write!(f, ": {}", self.ty)
    }
}
