/// Trait hierarchy for lint rules
///
/// A rule is first configured from its options, which is where invalid
/// configuration is rejected, and then run against any number of documents.
use crate::context::DocumentContext;
use crate::diagnostics::{LintDiagnostic, LintSeverity};
use crate::error::RuleOptionsError;

/// Base trait for all lint rules
pub trait LintRule: Send + Sync {
    /// Unique identifier for this rule (e.g., `"selection_set_depth"`)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Default severity (can be overridden by config)
    fn default_severity(&self) -> LintSeverity;
}

/// Lint rule that runs on a single executable document
///
/// The document's fragment spreads may resolve into sibling documents
/// through [`DocumentContext::fragments`].
pub trait DocumentLintRule: LintRule {
    /// Validate rule-specific options from `.graphqlrc.yaml`
    ///
    /// Rules define their own options struct and deserialize it from this
    /// JSON value.
    fn configure(
        &self,
        options: Option<&serde_json::Value>,
    ) -> Result<Box<dyn DocumentCheck>, RuleOptionsError>;
}

/// A configured rule, ready to check documents
pub trait DocumentCheck: Send + Sync {
    fn check(&self, ctx: &DocumentContext<'_>) -> Vec<LintDiagnostic>;
}
