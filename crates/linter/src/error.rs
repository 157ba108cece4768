use thiserror::Error;

/// A rule's options could not be turned into a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleOptionsError {
    #[error("missing required option `{0}`")]
    Missing(&'static str),

    #[error("`maxDepth` must be a positive integer, got {0}")]
    NonPositiveMaxDepth(i64),

    #[error("`maxDepth` of {0} is out of range")]
    MaxDepthOutOfRange(i64),

    #[error("ignore entries must not be empty")]
    EmptyMatcher,

    #[error("invalid ignore pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid options: {0}")]
    Malformed(String),
}

/// The lint configuration as a whole was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintConfigError {
    #[error("unknown lint rule '{name}'{}", did_you_mean(.suggestion))]
    UnknownRule {
        name: String,
        suggestion: Option<&'static str>,
    },

    #[error("invalid options for rule '{rule}': {reason}")]
    InvalidOptions {
        rule: &'static str,
        reason: RuleOptionsError,
    },
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    suggestion
        .map(|name| format!(" (did you mean '{name}'?)"))
        .unwrap_or_default()
}
