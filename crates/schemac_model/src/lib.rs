//! Type model compilation for schemac.
//!
//! This crate provides:
//! - `mapper`: Scalar resolution and identifier derivation
//! - `model`: The compiled `TypeModel`
//! - `builder`: Raw declarations to `TypeModel`
//! - `options`: Compiler configuration
//!
//! SDL and introspection JSON describing the same schema compile to equal
//! models.

pub mod builder;
pub mod mapper;
pub mod model;
pub mod options;

pub use builder::{NameRegistry, TypeModelBuilder};
pub use mapper::{to_identifier, IdentStyle, Mapper, ScalarOverrides, ScalarTable, ScalarTarget};
pub use model::{
    ArgDef, EnumTypeDef, FieldDef, InputTypeDef, InputValueDef, ModelTypeRef, NamedKind, NamedRef,
    ObjectTypeDef, ScalarDef, TypeModel,
};
pub use options::CompileOptions;

use schemac_core::{DiagnosticBag, RawSchema, Result};

/// Which encoding a schema source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Sdl,
    Introspection,
}

/// A successful compilation.
#[derive(Debug)]
pub struct Compilation {
    pub model: TypeModel,
    /// Skipped constructs, dropped fields and other non-fatal findings.
    pub warnings: DiagnosticBag,
    /// Number of unsupported constructs that were skipped.
    pub skipped: usize,
}

/// Compiles SDL text.
///
/// # Errors
///
/// Returns the first syntax, resolution or naming error. No partial model is
/// produced.
pub fn compile_sdl(source: &str, options: &CompileOptions) -> Result<Compilation> {
    let schema = schemac_syntax::parse_schema(source, options.policy)?;
    compile_raw(&schema, options)
}

/// Compiles introspection JSON.
///
/// # Errors
///
/// Returns the first format, resolution or naming error. No partial model is
/// produced.
pub fn compile_introspection(json: &str, options: &CompileOptions) -> Result<Compilation> {
    let schema = schemac_introspection::decode(json, options.policy)?;
    compile_raw(&schema, options)
}

/// Compiles a source in the given format.
///
/// # Errors
///
/// See [`compile_sdl`] and [`compile_introspection`].
pub fn compile(source: &str, format: SourceFormat, options: &CompileOptions) -> Result<Compilation> {
    let _span = tracing::debug_span!("compile", ?format).entered();
    match format {
        SourceFormat::Sdl => compile_sdl(source, options),
        SourceFormat::Introspection => compile_introspection(source, options),
    }
}

/// Compiles already decoded declarations.
///
/// # Errors
///
/// Returns the first resolution or naming error.
pub fn compile_raw(schema: &RawSchema, options: &CompileOptions) -> Result<Compilation> {
    let (model, warnings) = TypeModelBuilder::new(schema, options).build()?;
    Ok(Compilation {
        model,
        warnings,
        skipped: schema.skipped.len(),
    })
}
