use crate::config::LintConfig;
use crate::context::DocumentContext;
use crate::diagnostics::{LintDiagnostic, LintSeverity};
use crate::error::LintConfigError;
use crate::fragments::FragmentRegistry;
use crate::registry;
use crate::traits::DocumentCheck;
use graphql_syntax::Document;

struct EnabledRule {
    name: &'static str,
    severity: LintSeverity,
    check: Box<dyn DocumentCheck>,
}

/// A validated set of enabled rules
///
/// Construction fails on the first invalid rule configuration, so a
/// `Linter` that exists never rejects a document for configuration reasons.
pub struct Linter {
    rules: Vec<EnabledRule>,
}

impl Linter {
    #[tracing::instrument(skip_all)]
    pub fn new(config: &LintConfig) -> Result<Self, LintConfigError> {
        config.validate()?;

        let mut rules = Vec::new();
        for rule in registry::document_rules() {
            let name = rule.name();
            let Some(severity) = config
                .get_severity(name)
                .and_then(|severity| severity.diagnostic_severity())
            else {
                continue;
            };

            let check = rule
                .configure(config.get_options(name))
                .map_err(|reason| LintConfigError::InvalidOptions { rule: name, reason })?;

            tracing::debug!(rule = name, %severity, "Rule enabled");
            rules.push(EnabledRule {
                name,
                severity,
                check,
            });
        }

        Ok(Self { rules })
    }

    /// Names of the enabled rules
    pub fn enabled_rules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Lint `document`, resolving fragment spreads through the document
    /// itself and then through `siblings`, in order.
    ///
    /// Only roots of `document` are reported; sibling documents are
    /// fragment sources and nothing more.
    #[tracing::instrument(skip(self, document, siblings))]
    pub fn lint_document<'a, I>(
        &self,
        document: &'a Document,
        siblings: I,
        file_name: &str,
    ) -> Vec<LintDiagnostic>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let fragments = FragmentRegistry::register(document, siblings);
        let ctx = DocumentContext {
            document,
            file_name,
            fragments: &fragments,
        };

        let mut diagnostics: Vec<LintDiagnostic> = self
            .rules
            .iter()
            .flat_map(|rule| {
                rule.check
                    .check(&ctx)
                    .into_iter()
                    .map(|diagnostic| diagnostic.with_severity(rule.severity))
            })
            .collect();

        diagnostics.sort_by_key(|diagnostic| diagnostic.offset_range);
        tracing::debug!(count = diagnostics.len(), "Document linted");
        diagnostics
    }
}
