use crate::context::DocumentContext;
use crate::depth::{DepthCalculator, DepthReport, Overflow};
use crate::diagnostics::{CodeFix, LintDiagnostic, LintSeverity};
use crate::error::RuleOptionsError;
use crate::fragments::{FragmentRegistry, FragmentSource};
use crate::ignore::IgnoreList;
use crate::traits::{DocumentCheck, DocumentLintRule, LintRule};
use graphql_syntax::{Definition, Document, OffsetRange};
use serde::Deserialize;
use std::fmt;

pub const RULE_NAME: &str = "selection_set_depth";

/// Options as written in `.graphqlrc.yaml`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawOptions {
    #[serde(alias = "max_depth")]
    max_depth: Option<i64>,
    #[serde(default)]
    ignore: Vec<String>,
}

/// Validated options for the `selection_set_depth` rule
#[derive(Debug, Clone)]
pub struct SelectionSetDepthConfig {
    /// Deepest allowed field level, counting the first level as 0
    pub max_depth: u32,
    pub ignore: IgnoreList,
}

impl SelectionSetDepthConfig {
    pub fn new(max_depth: u32, ignore: IgnoreList) -> Result<Self, RuleOptionsError> {
        if max_depth == 0 {
            return Err(RuleOptionsError::NonPositiveMaxDepth(0));
        }
        Ok(Self { max_depth, ignore })
    }

    /// Validate raw rule options. `maxDepth` is required, so `None` is an error.
    pub fn from_options(options: Option<&serde_json::Value>) -> Result<Self, RuleOptionsError> {
        let value = options.ok_or(RuleOptionsError::Missing("maxDepth"))?;
        let raw: RawOptions = serde_json::from_value(value.clone())
            .map_err(|e| RuleOptionsError::Malformed(e.to_string()))?;

        let max_depth = match raw.max_depth {
            None => return Err(RuleOptionsError::Missing("maxDepth")),
            Some(depth) if depth <= 0 => return Err(RuleOptionsError::NonPositiveMaxDepth(depth)),
            Some(depth) => {
                u32::try_from(depth).map_err(|_| RuleOptionsError::MaxDepthOutOfRange(depth))?
            }
        };

        Self::new(max_depth, IgnoreList::parse(&raw.ignore)?)
    }
}

/// A root whose selections nest deeper than the configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Operation or fragment name, empty for anonymous operations
    pub root_name: String,
    pub max_depth: u32,
    pub observed_depth: i64,
    /// Range of the whole root definition
    pub range: OffsetRange,
    pub overflows: Vec<Overflow>,
}

impl Violation {
    fn from_report(root_name: &str, range: OffsetRange, max_depth: u32, report: DepthReport) -> Self {
        Self {
            root_name: root_name.to_string(),
            max_depth,
            observed_depth: report.max_depth,
            range,
            overflows: report.overflows,
        }
    }

    /// One removal suggestion per overflowing field written in the linted
    /// document. Fields reached through sibling fragments are left out since
    /// their text is not part of this document.
    #[must_use]
    pub fn fixes(&self) -> Vec<CodeFix> {
        self.overflows
            .iter()
            .filter(|overflow| overflow.source == FragmentSource::Primary)
            .map(|overflow| CodeFix::delete("Remove selections", overflow.range))
            .collect()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' exceeds maximum operation depth of {}",
            self.root_name, self.max_depth
        )
    }
}

/// Check one operation or fragment definition as its own root.
#[must_use]
pub fn check(
    definition: &Definition,
    config: &SelectionSetDepthConfig,
    registry: &FragmentRegistry<'_>,
) -> Option<Violation> {
    let calculator = DepthCalculator::new(registry, &config.ignore);

    let (root_name, report) = match definition {
        Definition::Operation(operation) => (
            operation.display_name(),
            calculator.analyze(&operation.selection_set, config.max_depth),
        ),
        Definition::Fragment(fragment) => (
            fragment.name.as_ref(),
            calculator.analyze_fragment(fragment, config.max_depth),
        ),
    };

    tracing::trace!(root = root_name, depth = report.max_depth, "Root depth computed");

    (report.max_depth > i64::from(config.max_depth)).then(|| {
        Violation::from_report(root_name, definition.range(), config.max_depth, report)
    })
}

/// Check every root of `document`, in document order.
#[must_use]
pub fn check_document(
    document: &Document,
    config: &SelectionSetDepthConfig,
    registry: &FragmentRegistry<'_>,
) -> Vec<Violation> {
    document
        .definitions
        .iter()
        .filter_map(|definition| check(definition, config, registry))
        .collect()
}

/// Lint rule that limits how deeply selection sets may nest
///
/// Fragment spreads and inline fragments are followed, so the limit applies
/// to the shape a server actually executes.
pub struct SelectionSetDepthRuleImpl;

impl LintRule for SelectionSetDepthRuleImpl {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Limits the depth of selection set nesting to prevent overly complex operations"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Error
    }
}

impl DocumentLintRule for SelectionSetDepthRuleImpl {
    fn configure(
        &self,
        options: Option<&serde_json::Value>,
    ) -> Result<Box<dyn DocumentCheck>, RuleOptionsError> {
        let config = SelectionSetDepthConfig::from_options(options)?;
        Ok(Box::new(SelectionSetDepthCheck { config }))
    }
}

struct SelectionSetDepthCheck {
    config: SelectionSetDepthConfig,
}

impl DocumentCheck for SelectionSetDepthCheck {
    fn check(&self, ctx: &DocumentContext<'_>) -> Vec<LintDiagnostic> {
        let violations = check_document(ctx.document, &self.config, ctx.fragments);
        if !violations.is_empty() {
            tracing::debug!(
                file = ctx.file_name,
                max_depth = self.config.max_depth,
                count = violations.len(),
                "Selection set depth exceeded"
            );
        }

        violations
            .into_iter()
            .map(|violation| {
                LintDiagnostic::new(
                    violation.range,
                    LintSeverity::Error,
                    violation.to_string(),
                    RULE_NAME,
                )
                .with_fixes(violation.fixes())
            })
            .collect()
    }
}
