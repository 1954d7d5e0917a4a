//! Compiler configuration.

use crate::mapper::{ScalarOverrides, ScalarTable, ScalarTarget};
use schemac_core::UnsupportedPolicy;

/// Options for one compilation. Every compilation owns its options; nothing
/// is shared between invocations.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// User scalar overrides. These take precedence over everything else.
    pub overrides: ScalarOverrides,

    /// Default targets for scalars.
    pub scalars: ScalarTable,

    /// Target for custom scalars with no override and no table entry.
    pub fallback: ScalarTarget,

    /// Handling of interfaces, unions, directive definitions and extensions.
    pub policy: UnsupportedPolicy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            overrides: ScalarOverrides::new(),
            scalars: ScalarTable::builtin(),
            fallback: ScalarTarget::new("String"),
            policy: UnsupportedPolicy::Skip,
        }
    }
}

impl CompileOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scalar overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ScalarOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Adds one override, e.g. `with_override("ID", "Guid")`.
    #[must_use]
    pub fn with_override(mut self, name: impl Into<String>, target: &str) -> Self {
        self.overrides.insert(name, ScalarTarget::parse(target));
        self
    }

    /// Replaces the scalar table.
    #[must_use]
    pub fn with_scalar_table(mut self, scalars: ScalarTable) -> Self {
        self.scalars = scalars;
        self
    }

    /// Sets the fallback target for unmapped custom scalars.
    #[must_use]
    pub fn with_fallback(mut self, target: &str) -> Self {
        self.fallback = ScalarTarget::parse(target);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fails on unsupported constructs instead of skipping them.
    #[must_use]
    pub fn strict(self) -> Self {
        self.with_policy(UnsupportedPolicy::Reject)
    }
}
