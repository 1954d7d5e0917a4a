//! Introspection JSON to raw declarations.

use crate::schema::{FullType, InputValue, IntrospectionSchema, TypeKind, TypeRefJson};
use schemac_core::{
    is_core_directive, CompileError, Construct, Origin, RawDecl, RawDeclKind, RawField,
    RawInputValue, RawSchema, Result, RootNames, TypeRef, UnsupportedPolicy,
};
use tracing::debug;

/// Decodes introspection JSON text.
///
/// Accepts a full response (`{"data": {"__schema": ..}}`), a `{"__schema": ..}`
/// wrapper, or the bare schema object.
///
/// # Errors
///
/// Returns [`CompileError::Format`] with the JSON path of the first problem,
/// and [`CompileError::UnsupportedConstruct`] under [`UnsupportedPolicy::Reject`].
pub fn decode(json: &str, policy: UnsupportedPolicy) -> Result<RawSchema> {
    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|err| format_error(".", err.to_string()))?;
    decode_value(document, policy)
}

/// Decodes an already parsed introspection document.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_value(document: serde_json::Value, policy: UnsupportedPolicy) -> Result<RawSchema> {
    let (prefix, value) = locate_schema(document)?;

    let schema: IntrospectionSchema = serde_path_to_error::deserialize(value).map_err(|err| {
        let path = join_path(prefix, &err.path().to_string());
        format_error(path, err.into_inner().to_string())
    })?;

    let mut decoder = Decoder {
        prefix,
        policy,
        schema: RawSchema::new(Origin::json(join_path(prefix, "queryType"))),
    };
    decoder.decode_schema(&schema)?;
    Ok(decoder.schema)
}

/// Finds the `__schema` object, returning its path and value.
fn locate_schema(mut document: serde_json::Value) -> Result<(&'static str, serde_json::Value)> {
    if !document.is_object() {
        return Err(format_error(".", "expected a JSON object"));
    }
    if document.get("data").is_some() {
        return match document.pointer_mut("/data/__schema") {
            Some(schema) => Ok(("data.__schema", schema.take())),
            None => Err(format_error("data", "missing field `__schema`")),
        };
    }
    if let Some(schema) = document.get_mut("__schema") {
        return Ok(("__schema", schema.take()));
    }
    if document.get("types").is_some() {
        return Ok(("", document));
    }
    Err(format_error(
        ".",
        "expected `data.__schema`, `__schema` or a schema object with `types`",
    ))
}

fn join_path(prefix: &str, relative: &str) -> String {
    match (prefix.is_empty(), relative) {
        (true, _) => relative.to_string(),
        (false, ".") => prefix.to_string(),
        (false, _) => format!("{prefix}.{relative}"),
    }
}

fn format_error(path: impl Into<String>, message: impl Into<String>) -> CompileError {
    CompileError::Format {
        path: path.into(),
        message: message.into(),
    }
}

struct Decoder {
    prefix: &'static str,
    policy: UnsupportedPolicy,
    schema: RawSchema,
}

impl Decoder {
    fn path(&self, relative: &str) -> String {
        join_path(self.prefix, relative)
    }

    fn unsupported(&mut self, construct: Construct, name: String, origin: Origin) -> Result<()> {
        if self.policy == UnsupportedPolicy::Skip {
            debug!(%construct, %name, %origin, "skipping unsupported construct");
        }
        self.schema.unsupported(self.policy, construct, name, origin)
    }

    fn decode_schema(&mut self, schema: &IntrospectionSchema) -> Result<()> {
        debug!(types = schema.types.len(), "decoding introspection schema");

        let query = schema
            .query_type
            .as_ref()
            .ok_or_else(|| format_error(self.path("queryType"), "missing query root type"))?;
        self.schema.roots = RootNames {
            query: Some(query.name.clone()),
            mutation: schema.mutation_type.as_ref().map(|root| root.name.clone()),
            subscription: schema.subscription_type.as_ref().map(|root| root.name.clone()),
        };

        let mut meta_types = 0usize;
        for (i, ty) in schema.types.iter().enumerate() {
            if ty.name.starts_with("__") {
                meta_types += 1;
                continue;
            }
            self.decode_type(ty, self.path(&format!("types[{i}]")))?;
        }

        for (i, directive) in schema.directives.iter().enumerate() {
            if !is_core_directive(&directive.name) {
                let origin = Origin::json(self.path(&format!("directives[{i}]")));
                self.unsupported(Construct::DirectiveDefinition, directive.name.clone(), origin)?;
            }
        }

        debug!(
            declarations = self.schema.declarations.len(),
            skipped = self.schema.skipped.len(),
            meta_types,
            "decoded introspection schema"
        );
        Ok(())
    }

    fn decode_type(&mut self, ty: &FullType, path: String) -> Result<()> {
        let kind = match ty.kind {
            TypeKind::Scalar => RawDeclKind::Scalar,
            TypeKind::Object => {
                let fields = ty
                    .fields
                    .as_deref()
                    .ok_or_else(|| format_error(&path, "OBJECT type without `fields`"))?;
                for (k, interface) in ty.interfaces.iter().flatten().enumerate() {
                    let origin = Origin::json(format!("{path}.interfaces[{k}]"));
                    let name = interface.name.clone().unwrap_or_default();
                    self.unsupported(Construct::Implements, name, origin)?;
                }
                let fields = fields
                    .iter()
                    .enumerate()
                    .map(|(j, field)| -> Result<RawField> {
                        let field_path = format!("{path}.fields[{j}]");
                        Ok(RawField {
                            name: field.name.clone(),
                            ty: decode_type_ref(&field.ty, &format!("{field_path}.type"))?,
                            args: decode_input_values(&field.args, &field_path, "args")?,
                            origin: Origin::json(field_path),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                RawDeclKind::Object { fields }
            }
            TypeKind::InputObject => {
                let fields = ty
                    .input_fields
                    .as_deref()
                    .ok_or_else(|| format_error(&path, "INPUT_OBJECT type without `inputFields`"))?;
                RawDeclKind::Input {
                    fields: decode_input_values(fields, &path, "inputFields")?,
                }
            }
            TypeKind::Enum => {
                let values = ty
                    .enum_values
                    .as_deref()
                    .ok_or_else(|| format_error(&path, "ENUM type without `enumValues`"))?;
                RawDeclKind::Enum {
                    values: values.iter().map(|value| value.name.clone()).collect(),
                }
            }
            TypeKind::Interface => {
                return self.unsupported(Construct::Interface, ty.name.clone(), Origin::json(path));
            }
            TypeKind::Union => {
                return self.unsupported(Construct::Union, ty.name.clone(), Origin::json(path));
            }
            TypeKind::List | TypeKind::NonNull => {
                return Err(format_error(
                    format!("{path}.kind"),
                    format!("{} is not a named type kind", ty.kind),
                ));
            }
        };

        self.schema.declarations.push(RawDecl {
            name: ty.name.clone(),
            kind,
            origin: Origin::json(path),
        });
        Ok(())
    }
}

/// Decodes the input values under `{parent}.{key}`.
fn decode_input_values(
    values: &[InputValue],
    parent: &str,
    key: &str,
) -> Result<Vec<RawInputValue>> {
    values
        .iter()
        .enumerate()
        .map(|(k, value)| -> Result<RawInputValue> {
            let path = format!("{parent}.{key}[{k}]");
            let default_value = value
                .default_value
                .as_deref()
                .map(|text| {
                    schemac_syntax::parse_value(text).map_err(|err| {
                        format_error(
                            format!("{path}.defaultValue"),
                            format!("invalid default value `{text}`: {err}"),
                        )
                    })
                })
                .transpose()?;
            Ok(RawInputValue {
                name: value.name.clone(),
                ty: decode_type_ref(&value.ty, &format!("{path}.type"))?,
                default_value,
                origin: Origin::json(path),
            })
        })
        .collect()
}

/// Rebuilds the wrapping of a `{ kind, name, ofType }` chain.
fn decode_type_ref(json: &TypeRefJson, path: &str) -> Result<TypeRef> {
    if !json.kind.is_wrapper() {
        return json
            .name
            .clone()
            .map(TypeRef::Named)
            .ok_or_else(|| format_error(path, format!("{} type reference without `name`", json.kind)));
    }

    let inner_path = format!("{path}.ofType");
    let inner = json
        .of_type
        .as_deref()
        .ok_or_else(|| format_error(path, format!("{} type reference without `ofType`", json.kind)))?;
    let inner = decode_type_ref(inner, &inner_path)?;

    match json.kind {
        TypeKind::NonNull => TypeRef::try_non_null(inner)
            .ok_or_else(|| format_error(inner_path, "NON_NULL cannot wrap another NON_NULL")),
        _ => Ok(TypeRef::list(inner)),
    }
}
