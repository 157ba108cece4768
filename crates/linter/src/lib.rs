//! # GraphQL Linter
//!
//! Limits how deeply the selection sets of executable GraphQL documents nest.
//!
//! Each operation, and each fragment definition taken as its own root, is
//! walked with fragment spreads resolved against the document and any number
//! of sibling documents. Roots whose deepest field is nested deeper than the
//! configured `maxDepth` are reported as `'<name>' exceeds maximum operation depth of
//! <maxDepth>`.
//!
//! ```rust,ignore
//! let config: LintConfig = serde_yaml::from_str(
//!     "rules: { selection_set_depth: [error, { maxDepth: 5 }] }",
//! )?;
//! let linter = Linter::new(&config)?;
//! let diagnostics = linter.lint_document(&document, &siblings, "query.graphql");
//! ```

mod config;
mod context;
mod depth;
mod diagnostics;
mod error;
mod fragments;
mod ignore;
mod linter;
mod registry;
pub mod rules;
mod traits;

pub use config::{LintConfig, LintRuleConfig, RuleSeverity};
pub use context::DocumentContext;
pub use depth::{DepthCalculator, DepthReport, Overflow, ROOT_DEPTH};
pub use diagnostics::{CodeFix, LintDiagnostic, LintSeverity, TextEdit};
pub use error::{LintConfigError, RuleOptionsError};
pub use fragments::{FragmentRegistry, FragmentSource, RegisteredFragment};
pub use ignore::{FieldMatcher, IgnoreList};
pub use linter::Linter;
pub use registry::{all_rule_names, document_rules, find_rule, suggest_rule_name};
pub use rules::selection_set_depth::{SelectionSetDepthConfig, Violation};
pub use traits::{DocumentCheck, DocumentLintRule, LintRule};
