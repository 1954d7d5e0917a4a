//! Type model construction from raw declarations.

use crate::mapper::{to_identifier, IdentStyle, Mapper};
use crate::model::{
    ArgDef, EnumTypeDef, FieldDef, InputTypeDef, InputValueDef, ModelTypeRef, NamedKind, NamedRef,
    ObjectTypeDef, ScalarDef, TypeModel,
};
use crate::options::CompileOptions;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use schemac_core::diagnostics::codes;
use schemac_core::{
    is_builtin_scalar, CompileError, Diagnostic, DiagnosticBag, Origin, RawDecl, RawDeclKind,
    RawField, RawInputValue, RawSchema, Result, TypeRef,
};
use std::collections::hash_map::Entry;
use tracing::debug;

/// Identifiers registered in one namespace, checked at insertion.
#[derive(Debug)]
pub struct NameRegistry {
    scope: String,
    owner: Option<String>,
    /// identifier -> source name
    entries: FxHashMap<String, String>,
}

impl NameRegistry {
    /// The schema-wide type namespace.
    #[must_use]
    pub fn global() -> Self {
        Self {
            scope: "schema".to_string(),
            owner: None,
            entries: FxHashMap::default(),
        }
    }

    /// The members of `owner`, e.g. the fields of a type.
    pub fn members(scope: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            owner: Some(owner.into()),
            entries: FxHashMap::default(),
        }
    }

    /// Registers `name` under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Duplicate`] if `name` is already registered and
    /// [`CompileError::Collision`] if another name already owns `identifier`.
    pub fn insert(&mut self, name: &str, identifier: &str, origin: &Origin) -> Result<()> {
        match self.entries.entry(identifier.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(name.to_string());
                Ok(())
            }
            Entry::Occupied(entry) if entry.get() == name => Err(CompileError::Duplicate {
                name: match &self.owner {
                    Some(owner) => format!("{owner}.{name}"),
                    None => name.to_string(),
                },
                origin: origin.clone(),
            }),
            Entry::Occupied(entry) => Err(CompileError::Collision {
                scope: self.scope.clone(),
                identifier: identifier.to_string(),
                first: entry.get().clone(),
                second: name.to_string(),
                origin: origin.clone(),
            }),
        }
    }

    /// Returns the source name registered under `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`TypeModel`] from a [`RawSchema`]. The schema is not modified.
pub struct TypeModelBuilder<'a> {
    schema: &'a RawSchema,
    mapper: Mapper<'a>,
    declared: FxHashMap<&'a str, &'a RawDecl>,
    skipped_types: FxHashSet<&'a str>,
    warnings: DiagnosticBag,
}

impl<'a> TypeModelBuilder<'a> {
    #[must_use]
    pub fn new(schema: &'a RawSchema, options: &'a CompileOptions) -> Self {
        Self {
            schema,
            mapper: Mapper::new(&options.overrides, &options.scalars, &options.fallback),
            declared: FxHashMap::default(),
            skipped_types: schema.skipped_types().collect(),
            warnings: DiagnosticBag::new(),
        }
    }

    /// Builds the model, returning it with the non-fatal diagnostics.
    ///
    /// # Errors
    ///
    /// Fails on duplicate declarations, identifier collisions, unresolved
    /// type references and a missing query root.
    pub fn build(mut self) -> Result<(TypeModel, DiagnosticBag)> {
        let schema = self.schema;
        debug!(declarations = schema.declarations.len(), "building type model");

        self.warnings.extend(schema.skipped.iter().map(Diagnostic::from));

        let mut registry = NameRegistry::global();
        for decl in &schema.declarations {
            if is_builtin_scalar(&decl.name) {
                if matches!(decl.kind, RawDeclKind::Scalar) {
                    continue;
                }
                return Err(CompileError::Duplicate {
                    name: decl.name.clone(),
                    origin: decl.origin.clone(),
                });
            }
            if self.declared.insert(&decl.name, decl).is_some() {
                return Err(CompileError::Duplicate {
                    name: decl.name.clone(),
                    origin: decl.origin.clone(),
                });
            }
            if !matches!(decl.kind, RawDeclKind::Scalar) {
                let identifier = to_identifier(&decl.name, IdentStyle::TypeMember);
                registry.insert(&decl.name, &identifier, &decl.origin)?;
            }
        }

        let query_name = schema.roots.query.as_deref().ok_or_else(|| {
            self.unresolved_root("Query", "the schema, which names no query root")
        })?;
        self.require_root(query_name, "the query root")?;
        let mutation_name = schema.roots.mutation.as_deref();
        if let Some(name) = mutation_name {
            self.require_root(name, "the mutation root")?;
        }
        if let Some(name) = &schema.roots.subscription {
            self.warnings.add(
                Diagnostic::info(
                    codes::SUBSCRIPTION_IGNORED,
                    format!("subscription root `{name}` is compiled as a plain object type"),
                )
                .with_origin(schema.roots_origin.clone(), "declared here"),
            );
        }

        let mut types = IndexMap::new();
        let mut inputs = IndexMap::new();
        let mut enums = IndexMap::new();
        let mut scalars = IndexMap::new();
        let mut query = None;
        let mut mutation = None;

        for decl in &schema.declarations {
            if is_builtin_scalar(&decl.name) {
                continue;
            }
            match &decl.kind {
                RawDeclKind::Object { fields } => {
                    let object = self.build_object(decl, fields)?;
                    let is_query = decl.name == query_name;
                    let is_mutation = mutation_name == Some(decl.name.as_str());
                    match (is_query, is_mutation) {
                        (true, true) => {
                            mutation = Some(object.clone());
                            query = Some(object);
                        }
                        (true, false) => query = Some(object),
                        (false, true) => mutation = Some(object),
                        (false, false) => {
                            types.insert(decl.name.clone(), object);
                        }
                    }
                }
                RawDeclKind::Input { fields } => {
                    inputs.insert(decl.name.clone(), self.build_input(decl, fields)?);
                }
                RawDeclKind::Enum { values } => {
                    enums.insert(decl.name.clone(), build_enum(decl, values)?);
                }
                RawDeclKind::Scalar => {
                    let target = self.mapper.resolve_custom_scalar(&decl.name);
                    scalars.insert(
                        decl.name.clone(),
                        ScalarDef {
                            name: decl.name.clone(),
                            target,
                        },
                    );
                }
            }
        }

        let query = query.ok_or_else(|| self.unresolved_root(query_name, "the query root"))?;
        let mutation = match (mutation, mutation_name) {
            (Some(mutation), _) => mutation,
            (None, Some(name)) => return Err(self.unresolved_root(name, "the mutation root")),
            (None, None) => {
                debug!("no mutation root declared, using an empty one");
                ObjectTypeDef::empty("Mutation", "Mutation")
            }
        };

        let model = TypeModel {
            types,
            inputs,
            enums,
            scalars,
            query,
            mutation,
        };
        debug!(
            types = model.types.len(),
            inputs = model.inputs.len(),
            enums = model.enums.len(),
            scalars = model.scalars.len(),
            warnings = self.warnings.len(),
            "built type model"
        );
        Ok((model, self.warnings))
    }

    fn require_root(&self, name: &str, context: &str) -> Result<()> {
        match self.declared.get(name) {
            Some(decl) if matches!(decl.kind, RawDeclKind::Object { .. }) => Ok(()),
            _ => Err(self.unresolved_root(name, context)),
        }
    }

    fn unresolved_root(&self, name: &str, context: &str) -> CompileError {
        CompileError::UnresolvedReference {
            name: name.to_string(),
            context: context.to_string(),
            origin: self.schema.roots_origin.clone(),
        }
    }

    /// Returns the skipped type a reference points at, if any.
    fn skipped_base<'t>(&self, ty: &'t TypeRef) -> Option<&'t str> {
        let base = ty.base().as_str();
        self.skipped_types.contains(base).then_some(base)
    }

    fn build_object(&mut self, decl: &RawDecl, fields: &[RawField]) -> Result<ObjectTypeDef> {
        let mut members = NameRegistry::members(format!("fields of `{}`", decl.name), &decl.name);
        let mut defs = Vec::with_capacity(fields.len());

        for field in fields {
            let path = format!("{}.{}", decl.name, field.name);
            if let Some(base) = self.skipped_base(&field.ty) {
                debug!(field = %path, %base, "dropping field of skipped type");
                self.warnings.warning(
                    codes::DROPPED_FIELD,
                    format!("dropped field `{path}` of skipped type `{base}`"),
                    field.origin.clone(),
                );
                continue;
            }

            let identifier = to_identifier(&field.name, IdentStyle::TypeMember);
            members.insert(&field.name, &identifier, &field.origin)?;
            let ty = self.resolve_type(&field.ty, &format!("field `{path}`"), &field.origin)?;
            let args = self.build_args(&path, &field.args)?;

            defs.push(FieldDef {
                name: field.name.clone(),
                identifier,
                ty,
                args,
            });
        }

        Ok(ObjectTypeDef {
            name: decl.name.clone(),
            identifier: to_identifier(&decl.name, IdentStyle::TypeMember),
            fields: defs,
        })
    }

    fn build_args(&mut self, field_path: &str, args: &[RawInputValue]) -> Result<Vec<ArgDef>> {
        let mut members = NameRegistry::members(format!("arguments of `{field_path}`"), field_path);
        let mut defs = Vec::with_capacity(args.len());

        for arg in args {
            let path = format!("{field_path}({})", arg.name);
            if let Some(base) = self.skipped_base(&arg.ty) {
                debug!(argument = %path, %base, "dropping argument of skipped type");
                self.warnings.warning(
                    codes::DROPPED_ARGUMENT,
                    format!("dropped argument `{path}` of skipped type `{base}`"),
                    arg.origin.clone(),
                );
                continue;
            }

            let identifier = to_identifier(&arg.name, IdentStyle::LocalVariable);
            members.insert(&arg.name, &identifier, &arg.origin)?;
            defs.push(self.build_input_value(arg, identifier, &format!("argument `{path}`"))?);
        }

        Ok(defs)
    }

    fn build_input(&mut self, decl: &RawDecl, fields: &[RawInputValue]) -> Result<InputTypeDef> {
        let mut members = NameRegistry::members(format!("fields of `{}`", decl.name), &decl.name);
        let mut defs = Vec::with_capacity(fields.len());

        for field in fields {
            let path = format!("{}.{}", decl.name, field.name);
            if let Some(base) = self.skipped_base(&field.ty) {
                debug!(field = %path, %base, "dropping input field of skipped type");
                self.warnings.warning(
                    codes::DROPPED_FIELD,
                    format!("dropped input field `{path}` of skipped type `{base}`"),
                    field.origin.clone(),
                );
                continue;
            }

            let identifier = to_identifier(&field.name, IdentStyle::TypeMember);
            members.insert(&field.name, &identifier, &field.origin)?;
            defs.push(self.build_input_value(field, identifier, &format!("input field `{path}`"))?);
        }

        Ok(InputTypeDef {
            name: decl.name.clone(),
            identifier: to_identifier(&decl.name, IdentStyle::TypeMember),
            fields: defs,
        })
    }

    fn build_input_value(
        &self,
        value: &RawInputValue,
        identifier: String,
        context: &str,
    ) -> Result<InputValueDef> {
        Ok(InputValueDef {
            name: value.name.clone(),
            identifier,
            ty: self.resolve_type(&value.ty, context, &value.origin)?,
            default_value: value.default_value.clone(),
        })
    }

    /// Resolves every leaf of `ty`, keeping the wrapping as is.
    fn resolve_type(&self, ty: &TypeRef, context: &str, origin: &Origin) -> Result<ModelTypeRef> {
        ty.try_map(&mut |name: &String| self.resolve_named(name, context, origin))
    }

    fn resolve_named(&self, name: &str, context: &str, origin: &Origin) -> Result<NamedRef> {
        if is_builtin_scalar(name) {
            return Ok(NamedRef::scalar(name, self.mapper.resolve_scalar(name)));
        }

        let decl = self
            .declared
            .get(name)
            .ok_or_else(|| CompileError::UnresolvedReference {
                name: name.to_string(),
                context: context.to_string(),
                origin: origin.clone(),
            })?;

        let kind = match decl.kind {
            RawDeclKind::Scalar => {
                return Ok(NamedRef::scalar(name, self.mapper.resolve_custom_scalar(name)));
            }
            RawDeclKind::Object { .. } => NamedKind::Object,
            RawDeclKind::Input { .. } => NamedKind::Input,
            RawDeclKind::Enum { .. } => NamedKind::Enum,
        };

        let (target, value_type) = match self.mapper.override_for(name) {
            Some(target) => (target.name.clone(), target.value_type),
            None => (to_identifier(name, IdentStyle::TypeMember), false),
        };

        Ok(NamedRef {
            name: name.to_string(),
            kind,
            target,
            value_type,
        })
    }
}

fn build_enum(decl: &RawDecl, values: &[String]) -> Result<EnumTypeDef> {
    let mut set = IndexSet::with_capacity(values.len());
    for value in values {
        if !set.insert(value.clone()) {
            return Err(CompileError::Duplicate {
                name: format!("{}.{value}", decl.name),
                origin: decl.origin.clone(),
            });
        }
    }

    Ok(EnumTypeDef {
        name: decl.name.clone(),
        identifier: to_identifier(&decl.name, IdentStyle::TypeMember),
        values: set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemac_core::diagnostics::DiagnosticSeverity;
    use schemac_core::UnsupportedPolicy;

    fn build_with(source: &str, options: &CompileOptions) -> Result<(TypeModel, DiagnosticBag)> {
        let schema = schemac_syntax::parse_schema(source, options.policy)?;
        TypeModelBuilder::new(&schema, options).build()
    }

    fn build(source: &str) -> (TypeModel, DiagnosticBag) {
        match build_with(source, &CompileOptions::default()) {
            Ok(result) => result,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    fn build_err(source: &str) -> CompileError {
        match build_with(source, &CompileOptions::default()) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err,
        }
    }

    const SCHEMA: &str = r"
        scalar DateTime

        enum Role { ADMIN USER }

        input UserFilter {
          role: Role = USER
          since: DateTime
        }

        type User {
          id: ID!
          name: String
          age: Int!
          friends(First: Int = 10, after: ID): [User!]!
        }

        type Query {
          users(filter: UserFilter): [User]
          me: User
        }
    ";

    #[test]
    fn test_build_basic_model() {
        let (model, warnings) = build(SCHEMA);
        assert!(warnings.is_empty());

        assert_eq!(model.query.name, "Query");
        assert_eq!(model.mutation, ObjectTypeDef::empty("Mutation", "Mutation"));
        assert_eq!(model.types.keys().collect::<Vec<_>>(), vec!["User"]);
        assert_eq!(model.inputs.len(), 1);
        assert_eq!(model.enums["Role"].values.len(), 2);
        assert_eq!(model.scalars["DateTime"].target.name, "String");

        let user = &model.types["User"];
        let friends = user.field("friends").unwrap();
        assert_eq!(friends.identifier, "Friends");
        assert_eq!(friends.args[0].identifier, "first");
        assert_eq!(friends.ty.base().kind, NamedKind::Object);
        assert_eq!(friends.ty.base().target, "User");
    }

    #[test]
    fn test_field_display() {
        let (model, _) = build(SCHEMA);
        let friends = model.types["User"].field("friends").unwrap();
        insta::assert_snapshot!(friends.to_string(), @"friends(First: Int = 10, after: ID): [User!]!");
    }

    #[test]
    fn test_scalar_targets() {
        let (model, _) = build(SCHEMA);
        let user = &model.types["User"];
        let age = user.field("age").unwrap().ty.base();
        assert_eq!((age.target.as_str(), age.value_type), ("Int", true));
        let name = user.field("name").unwrap().ty.base();
        assert_eq!((name.target.as_str(), name.value_type), ("String", false));
        let since = &model.inputs["UserFilter"].fields[1];
        assert_eq!(since.ty.base().target, "String");
        assert_eq!(since.ty.base().kind, NamedKind::Scalar);
    }

    #[test]
    fn test_overrides() {
        let options = CompileOptions::default()
            .with_override("ID", "Guid")
            .with_override("DateTime", "Instant!")
            .with_fallback("Text");
        let (model, _) = build_with(SCHEMA, &options).unwrap();

        let user = &model.types["User"];
        assert_eq!(user.field("id").unwrap().ty.base().target, "Guid");
        assert_eq!(user.field("friends").unwrap().args[1].ty.base().target, "Guid");
        assert_eq!(model.scalars["DateTime"].target.to_string(), "Instant!");
    }

    #[test]
    fn test_no_dangling_references() {
        let (model, _) = build(SCHEMA);
        let refs = model.references();
        assert_eq!(refs.len(), 11);
        for (location, ty) in refs {
            assert!(model.contains_type(&ty.base().name), "{location}");
        }
    }

    #[test]
    fn test_unresolved_reference() {
        match build_err("type Query {\n  me: Viewer\n}") {
            CompileError::UnresolvedReference {
                name,
                context,
                origin,
            } => {
                assert_eq!(name, "Viewer");
                assert_eq!(context, "field `Query.me`");
                assert_eq!(origin, Origin::Sdl { line: 2, column: 3 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_query_root() {
        let err = build_err("type Mutation { a: Int }");
        assert!(matches!(
            err,
            CompileError::UnresolvedReference { ref name, ref context, .. }
                if name == "Query" && context == "the schema, which names no query root"
        ));
    }

    #[test]
    fn test_schema_block_without_query() {
        let source = "type Query { a: Int }
type M { b: Int }
schema { mutation: M }";
        match build_err(source) {
            CompileError::UnresolvedReference { name, origin, .. } => {
                assert_eq!(name, "Query");
                assert_eq!(origin, Origin::Sdl { line: 3, column: 1 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_named_query_root_missing() {
        let err = build_err("schema { query: Root }
type Query { a: Int }");
        assert!(matches!(
            err,
            CompileError::UnresolvedReference { ref name, ref context, .. }
                if name == "Root" && context == "the query root"
        ));
    }

    #[test]
    fn test_query_root_must_be_object() {
        let err = build_err("schema { query: Root }\nenum Root { A }");
        assert_eq!(err.name(), Some("Root"));
    }

    #[test]
    fn test_declared_mutation_root() {
        let (model, _) = build("type Query { a: Int }\ntype Mutation { b(x: Int): Int }");
        assert_eq!(model.mutation.fields.len(), 1);
        assert!(model.types.is_empty());
    }

    #[test]
    fn test_type_collision() {
        match build_err("type Query { a: Foo }\ntype Foo { x: Int }\ntype foo { y: Int }") {
            CompileError::Collision {
                scope,
                identifier,
                first,
                second,
                origin,
            } => {
                assert_eq!(scope, "schema");
                assert_eq!(identifier, "Foo");
                assert_eq!((first.as_str(), second.as_str()), ("Foo", "foo"));
                assert_eq!(origin, Origin::Sdl { line: 3, column: 1 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collision_across_kinds() {
        let err = build_err("type Query { a: Int }\nenum status { A }\ninput Status { b: Int }");
        assert!(matches!(err, CompileError::Collision { ref first, .. } if first == "status"));
    }

    #[test]
    fn test_field_and_argument_collisions() {
        match build_err("type Query { name: Int Name: Int }") {
            CompileError::Collision { scope, identifier, .. } => {
                assert_eq!(scope, "fields of `Query`");
                assert_eq!(identifier, "Name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        match build_err("type Query { a(x: Int, X: Int): Int }") {
            CompileError::Collision { scope, identifier, .. } => {
                assert_eq!(scope, "arguments of `Query.a`");
                assert_eq!(identifier, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicates() {
        let err = build_err("type Query { a: Int }\ntype Query { b: Int }");
        assert!(matches!(err, CompileError::Duplicate { ref name, .. } if name == "Query"));

        let err = build_err("type Query { a: Int a: String }");
        assert!(matches!(err, CompileError::Duplicate { ref name, .. } if name == "Query.a"));

        let err = build_err("type Query { a: E }\nenum E { X X }");
        assert!(matches!(err, CompileError::Duplicate { ref name, .. } if name == "E.X"));

        let err = build_err("type Query { a: Int }\ntype String { b: Int }");
        assert!(matches!(err, CompileError::Duplicate { ref name, .. } if name == "String"));
    }

    #[test]
    fn test_builtin_scalar_declaration_ignored() {
        let (model, _) = build("scalar Int\ntype Query { a: Int }");
        assert!(model.scalars.is_empty());
    }

    #[test]
    fn test_fields_of_skipped_types_dropped() {
        let (model, warnings) = build(
            "interface Node { id: ID! }\nunion Hit = Query\ntype Query {\n  node: Node\n  hits: [Hit!]\n  a: Int\n}",
        );
        assert_eq!(
            model.query.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["a"]
        );
        let found: Vec<_> = warnings.iter().map(|d| d.code).collect();
        assert_eq!(
            found,
            vec![
                codes::SKIPPED_CONSTRUCT,
                codes::SKIPPED_CONSTRUCT,
                codes::DROPPED_FIELD,
                codes::DROPPED_FIELD,
            ]
        );
        assert_eq!(warnings.warning_count(), 4);
    }

    #[test]
    fn test_rejected_constructs_fail() {
        let options = CompileOptions::default().strict();
        let err = build_with("interface Node { id: ID! }\ntype Query { a: Int }", &options).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedConstruct { .. }));
        assert_eq!(options.policy, UnsupportedPolicy::Reject);
    }

    #[test]
    fn test_subscription_is_reported() {
        let (model, warnings) = build("type Query { a: Int }\ntype Subscription { tick: Int }");
        assert!(model.types.contains_key("Subscription"));
        let diag = warnings.iter().next().unwrap();
        assert_eq!(diag.severity, DiagnosticSeverity::Info);
        assert_eq!(diag.code, codes::SUBSCRIPTION_IGNORED);
        assert_eq!(warnings.warning_count(), 0);
    }

    #[test]
    fn test_registry() {
        let origin = Origin::json("types[0]");
        let mut registry = NameRegistry::global();
        registry.insert("User", "User", &origin).unwrap();
        assert_eq!(registry.get("User"), Some("User"));
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.insert("user", "User", &origin),
            Err(CompileError::Collision { .. })
        ));
        assert!(matches!(
            registry.insert("User", "User", &origin),
            Err(CompileError::Duplicate { .. })
        ));
    }
}
