use crate::diagnostics::LintSeverity;
use crate::error::LintConfigError;
use crate::registry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configured level of a lint rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Off,
    Warn,
    Error,
}

impl RuleSeverity {
    /// Severity of the diagnostics an enabled rule reports
    #[must_use]
    pub const fn diagnostic_severity(self) -> Option<LintSeverity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(LintSeverity::Warning),
            Self::Error => Some(LintSeverity::Error),
        }
    }
}

/// Configuration for a single lint rule
///
/// Supports multiple formats:
/// ```yaml
/// # Simple severity
/// rule_name: error
///
/// # Object style with options
/// rule_name:
///   severity: warn
///   options:
///     maxDepth: 5
///
/// # ESLint-style array: [severity, options]
/// rule_name: [error, { maxDepth: 5, ignore: [edges] }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LintRuleConfig {
    /// Just a severity level (simple case)
    Severity(RuleSeverity),

    /// Detailed config with options
    Detailed {
        severity: RuleSeverity,
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<serde_json::Value>,
    },
}

impl LintRuleConfig {
    /// Get the severity for this rule configuration
    #[must_use]
    pub const fn severity(&self) -> RuleSeverity {
        match self {
            Self::Severity(s) | Self::Detailed { severity: s, .. } => *s,
        }
    }

    /// Get the options for this rule configuration (if any)
    #[must_use]
    pub const fn options(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Severity(_) => None,
            Self::Detailed { options, .. } => options.as_ref(),
        }
    }
}

/// Custom deserializer for `LintRuleConfig` to handle ESLint-style array syntax
impl<'de> Deserialize<'de> for LintRuleConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct LintRuleConfigVisitor;

        impl<'de> Visitor<'de> for LintRuleConfigVisitor {
            type Value = LintRuleConfig;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "a severity string ('off', 'warn', 'error'), \
                     an array [severity, options], \
                     or an object { severity, options }",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let severity = match value {
                    "off" => RuleSeverity::Off,
                    "warn" => RuleSeverity::Warn,
                    "error" => RuleSeverity::Error,
                    _ => return Err(E::custom(format!("unknown severity: {value}"))),
                };
                Ok(LintRuleConfig::Severity(severity))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                // ESLint-style: [severity, options]
                let severity: RuleSeverity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with severity"))?;

                let options: Option<serde_json::Value> = seq.next_element()?;

                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &"[severity, options]"));
                }

                Ok(LintRuleConfig::Detailed { severity, options })
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Object style: { severity, options }
                #[derive(Deserialize)]
                #[serde(deny_unknown_fields)]
                struct DetailedConfig {
                    severity: RuleSeverity,
                    #[serde(default)]
                    options: Option<serde_json::Value>,
                }

                let config =
                    DetailedConfig::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(LintRuleConfig::Detailed {
                    severity: config.severity,
                    options: config.options,
                })
            }
        }

        deserializer.deserialize_any(LintRuleConfigVisitor)
    }
}

/// Lint configuration, read from `extensions.lint` of a project
///
/// ```yaml
/// lint:
///   rules:
///     selection_set_depth: [error, { maxDepth: 5, ignore: [edges, node] }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rules: HashMap<String, LintRuleConfig>,
}

impl LintConfig {
    /// Check that every configured rule exists.
    ///
    /// Rule names are checked in sorted order so the reported error does not
    /// depend on map iteration order.
    pub fn validate(&self) -> Result<(), LintConfigError> {
        let known = registry::all_rule_names();

        let mut configured: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        configured.sort_unstable();

        match configured.into_iter().find(|name| !known.contains(name)) {
            Some(name) => Err(LintConfigError::UnknownRule {
                name: name.to_string(),
                suggestion: registry::suggest_rule_name(name),
            }),
            None => Ok(()),
        }
    }

    /// Get the configured severity for a rule, `None` when unconfigured
    #[must_use]
    pub fn get_severity(&self, rule_name: &str) -> Option<RuleSeverity> {
        self.rules.get(rule_name).map(LintRuleConfig::severity)
    }

    /// Get the options for a rule (if configured)
    #[must_use]
    pub fn get_options(&self, rule_name: &str) -> Option<&serde_json::Value> {
        self.rules.get(rule_name).and_then(LintRuleConfig::options)
    }

    /// Check if a rule is enabled (configured and not `off`)
    #[must_use]
    pub fn is_enabled(&self, rule_name: &str) -> bool {
        matches!(
            self.get_severity(rule_name),
            Some(RuleSeverity::Warn | RuleSeverity::Error)
        )
    }

    /// Replace the configuration of one rule
    pub fn set_rule(&mut self, rule_name: impl Into<String>, config: LintRuleConfig) {
        self.rules.insert(rule_name.into(), config);
    }

    /// Merge another config into this one; rules in `override_config` win
    #[must_use]
    pub fn merge(&self, override_config: &Self) -> Self {
        let mut rules = self.rules.clone();
        rules.extend(override_config.rules.clone());
        Self { rules }
    }
}
