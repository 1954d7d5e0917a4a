//! Compile errors.
//!
//! Every failure is fatal: a failed compilation never yields a partial model.

use crate::decl::Construct;
use crate::origin::Origin;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Which input an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Sdl,
    Introspection,
    /// Compiler configuration, such as scalar overrides.
    Config,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Sdl => "SDL",
            Self::Introspection => "introspection",
            Self::Config => "config",
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// Malformed SDL.
    #[error("syntax error at {line}:{column}: {message}")]
    #[diagnostic(code(schemac::syntax))]
    Syntax {
        message: String,
        line: u32,
        column: u32,
        #[label("here")]
        span: SourceSpan,
    },

    /// Malformed or incomplete introspection JSON.
    #[error("malformed introspection at `{path}`: {message}")]
    #[diagnostic(code(schemac::format))]
    Format { path: String, message: String },

    /// A type reference names a type the schema does not declare.
    #[error("unknown type `{name}` referenced by {context} ({origin})")]
    #[diagnostic(
        code(schemac::unresolved_reference),
        help("declare the type in the schema or map it with a scalar override")
    )]
    UnresolvedReference {
        name: String,
        context: String,
        origin: Origin,
    },

    /// Two distinct source names normalize to the same identifier.
    #[error("`{first}` and `{second}` both map to identifier `{identifier}` in {scope} ({origin})")]
    #[diagnostic(code(schemac::collision))]
    Collision {
        scope: String,
        identifier: String,
        first: String,
        second: String,
        origin: Origin,
    },

    /// The same name is declared twice.
    #[error("`{name}` is declared more than once ({origin})")]
    #[diagnostic(code(schemac::duplicate))]
    Duplicate { name: String, origin: Origin },

    /// An unsupported construct under the reject policy.
    #[error("unsupported {construct} `{name}` at {origin}")]
    #[diagnostic(
        code(schemac::unsupported),
        help("interfaces, unions, directive definitions and extensions are not compiled; use the skip policy to ignore them")
    )]
    UnsupportedConstruct {
        construct: Construct,
        name: String,
        origin: Origin,
    },

    /// A malformed scalar override pair.
    #[error("invalid scalar override `{pair}`: {reason}")]
    #[diagnostic(code(schemac::invalid_override), help("overrides are written `GraphQLName=TargetType`"))]
    InvalidOverride { pair: String, reason: String },
}

impl CompileError {
    /// Returns the input this error is attributed to.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        match self {
            Self::Syntax { .. } => SourceKind::Sdl,
            Self::Format { .. } => SourceKind::Introspection,
            Self::UnresolvedReference { origin, .. }
            | Self::Collision { origin, .. }
            | Self::Duplicate { origin, .. }
            | Self::UnsupportedConstruct { origin, .. } => origin.source_kind(),
            Self::InvalidOverride { .. } => SourceKind::Config,
        }
    }

    /// Returns the offending name, if the error is about one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::UnresolvedReference { name, .. }
            | Self::Duplicate { name, .. }
            | Self::UnsupportedConstruct { name, .. } => Some(name),
            Self::Collision { second, .. } => Some(second),
            Self::InvalidOverride { pair, .. } => Some(pair),
            Self::Syntax { .. } | Self::Format { .. } => None,
        }
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
