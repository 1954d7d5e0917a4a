//! Source origins of raw declarations.

use crate::error::SourceKind;
use crate::span::LineCol;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a declaration, field or argument was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Origin {
    /// A position in SDL text.
    Sdl { line: u32, column: u32 },
    /// A JSON path inside an introspection document, e.g. `__schema.types[3].fields[0]`.
    Introspection { path: String },
}

impl Origin {
    /// Creates an SDL origin.
    #[must_use]
    pub const fn sdl(pos: LineCol) -> Self {
        Self::Sdl {
            line: pos.line,
            column: pos.column,
        }
    }

    /// Creates an introspection origin.
    pub fn json(path: impl Into<String>) -> Self {
        Self::Introspection { path: path.into() }
    }

    /// Returns which encoding this origin belongs to.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        match self {
            Self::Sdl { .. } => SourceKind::Sdl,
            Self::Introspection { .. } => SourceKind::Introspection,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sdl { line, column } => write!(f, "line {line}, column {column}"),
            Self::Introspection { path } => write!(f, "JSON path `{path}`"),
        }
    }
}
