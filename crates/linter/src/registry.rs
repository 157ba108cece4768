/// Registry of all available lint rules
use crate::rules::SelectionSetDepthRuleImpl;
use crate::traits::DocumentLintRule;
use std::sync::Arc;

/// Get all document lint rules
#[must_use]
pub fn document_rules() -> Vec<Arc<dyn DocumentLintRule>> {
    vec![Arc::new(SelectionSetDepthRuleImpl)]
}

/// Names of every registered rule
#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    document_rules().iter().map(|rule| rule.name()).collect()
}

/// Find a rule by its configuration name
#[must_use]
pub fn find_rule(name: &str) -> Option<Arc<dyn DocumentLintRule>> {
    document_rules().into_iter().find(|rule| rule.name() == name)
}

/// The registered rule name closest to `name`, if any is close enough to be
/// a likely typo.
#[must_use]
pub fn suggest_rule_name(name: &str) -> Option<&'static str> {
    all_rule_names()
        .into_iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(name, candidate)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}
