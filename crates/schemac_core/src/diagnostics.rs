//! Non-fatal diagnostics.
//!
//! Fatal problems are [`CompileError`](crate::CompileError)s; everything the
//! compiler drops or ignores while still producing a model is reported here.

use crate::decl::Skipped;
use crate::origin::Origin;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// A warning that doesn't prevent compilation.
    Warning,
    /// An informational message.
    Info,
}

/// A label attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct Label {
    /// Where the label points.
    pub origin: Origin,
    /// The label message.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    pub fn new(origin: Origin, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
        }
    }
}

/// A diagnostic message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: DiagnosticSeverity,
    /// Diagnostic code.
    pub code: &'static str,
    /// Short title.
    pub title: String,
    /// Labels pointing to source locations.
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Creates a new warning diagnostic.
    pub fn warning(code: &'static str, title: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            code,
            title: title.into(),
            labels: Vec::new(),
        }
    }

    /// Creates a new informational diagnostic.
    pub fn info(code: &'static str, title: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Info,
            code,
            title: title.into(),
            labels: Vec::new(),
        }
    }

    /// Adds a label at an origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(origin, message));
        self
    }

    /// Returns the primary origin, if any.
    #[must_use]
    pub fn primary_origin(&self) -> Option<&Origin> {
        self.labels.first().map(|l| &l.origin)
    }
}

impl From<&Skipped> for Diagnostic {
    fn from(skipped: &Skipped) -> Self {
        Diagnostic::warning(
            codes::SKIPPED_CONSTRUCT,
            format!("skipped {} `{}`", skipped.construct, skipped.name),
        )
        .with_origin(skipped.origin.clone(), "not compiled")
    }
}

/// A collection of diagnostics.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    /// Creates a new empty diagnostic bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Adds a warning diagnostic.
    pub fn warning(&mut self, code: &'static str, title: impl Into<String>, origin: Origin) {
        self.add(Diagnostic::warning(code, title).with_origin(origin, ""));
    }

    /// Returns the number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns an iterator over warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns true if there are no diagnostics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl Extend<Diagnostic> for DiagnosticBag {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

/// Diagnostic codes.
pub mod codes {
    pub const SKIPPED_CONSTRUCT: &str = "W0001";
    pub const DROPPED_FIELD: &str = "W0002";
    pub const DROPPED_ARGUMENT: &str = "W0003";
    pub const SUBSCRIPTION_IGNORED: &str = "I0001";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::Construct;

    #[test]
    fn test_diagnostic_bag() {
        let mut bag = DiagnosticBag::new();
        bag.warning(codes::DROPPED_FIELD, "dropped", Origin::json("x"));
        bag.add(Diagnostic::info(codes::SUBSCRIPTION_IGNORED, "ignored"));

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.warning_count(), 1);
    }

    #[test]
    fn test_from_skipped() {
        let skipped = Skipped {
            construct: Construct::Interface,
            name: "Node".into(),
            origin: Origin::Sdl { line: 4, column: 1 },
        };
        let diag = Diagnostic::from(&skipped);
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        assert_eq!(diag.title, "skipped interface `Node`");
        assert_eq!(diag.primary_origin(), Some(&skipped.origin));
    }
}
