//! Core types for schemac.
//!
//! This crate provides the shapes shared by both schema encodings:
//! - `span`: Byte spans and line/column lookup
//! - `origin`: Where a declaration came from (SDL position or JSON path)
//! - `types`: The tagged `TypeRef` wrapping
//! - `value`: GraphQL literal values (default values)
//! - `decl`: Raw declarations produced by the SDL parser and the introspection decoder
//! - `error`: The compile error taxonomy
//! - `diagnostics`: Non-fatal warnings

pub mod decl;
pub mod diagnostics;
pub mod error;
pub mod origin;
pub mod span;
pub mod types;
pub mod value;

pub use decl::{
    Construct, RawDecl, RawDeclKind, RawField, RawInputValue, RawSchema, RootNames, Skipped,
    UnsupportedPolicy,
};
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity, Label};
pub use error::{CompileError, Result, SourceKind};
pub use origin::Origin;
pub use span::{LineCol, LineIndex, Span};
pub use types::TypeRef;
pub use value::Value;

/// The scalars every GraphQL schema has without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Returns true if `name` is one of the built-in scalars.
#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Directives that carry no schema semantics and are ignored silently.
pub const CORE_DIRECTIVES: [&str; 5] = ["deprecated", "include", "skip", "specifiedBy", "oneOf"];

/// Returns true if `name` is one of the core directives.
#[must_use]
pub fn is_core_directive(name: &str) -> bool {
    CORE_DIRECTIVES.contains(&name)
}
