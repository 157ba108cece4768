use crate::error::RuleOptionsError;
use regex::Regex;
use std::collections::HashSet;

/// Matches field names whose own nesting level is not counted.
///
/// An entry written as `/pattern/` is a regular expression searched anywhere
/// in the field name; anything else is an exact field name.
#[derive(Debug, Clone)]
pub enum FieldMatcher {
    Exact(String),
    Pattern(Regex),
}

impl FieldMatcher {
    pub fn parse(raw: &str) -> Result<Self, RuleOptionsError> {
        if raw.is_empty() {
            return Err(RuleOptionsError::EmptyMatcher);
        }

        match raw.strip_prefix('/').and_then(|rest| rest.strip_suffix('/')) {
            Some(pattern) if !pattern.is_empty() => Regex::new(pattern)
                .map(Self::Pattern)
                .map_err(|e| RuleOptionsError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                }),
            _ => Ok(Self::Exact(raw.to_string())),
        }
    }

    #[must_use]
    pub fn matches(&self, field_name: &str) -> bool {
        match self {
            Self::Exact(name) => name == field_name,
            Self::Pattern(regex) => regex.is_match(field_name),
        }
    }
}

/// The configured set of ignored fields.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    names: HashSet<String>,
    patterns: Vec<Regex>,
}

impl IgnoreList {
    /// Parse every entry, failing on the first invalid one.
    pub fn parse<I, S>(entries: I) -> Result<Self, RuleOptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|entry| FieldMatcher::parse(entry.as_ref()))
            .collect()
    }

    #[must_use]
    pub fn matches(&self, field_name: &str) -> bool {
        self.names.contains(field_name) || self.patterns.iter().any(|p| p.is_match(field_name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.patterns.is_empty()
    }
}

impl FromIterator<FieldMatcher> for IgnoreList {
    fn from_iter<T: IntoIterator<Item = FieldMatcher>>(iter: T) -> Self {
        let mut list = Self::default();
        for matcher in iter {
            match matcher {
                FieldMatcher::Exact(name) => {
                    list.names.insert(name);
                }
                FieldMatcher::Pattern(regex) => list.patterns.push(regex),
            }
        }
        list
    }
}
