use crate::files;
use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Name under which a single-project config is exposed.
pub const DEFAULT_PROJECT: &str = "default";

/// Top-level GraphQL configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLConfig {
    /// Multi-project configuration
    Multi {
        projects: BTreeMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl GraphQLConfig {
    /// Get all projects as an iterator, ordered by name.
    /// For single project configs, yields a single item named "default".
    #[must_use]
    pub fn projects(&self) -> Box<dyn Iterator<Item = (&str, &ProjectConfig)> + '_> {
        match self {
            Self::Single(config) => Box::new(std::iter::once((DEFAULT_PROJECT, config.as_ref()))),
            Self::Multi { projects } => Box::new(
                projects
                    .iter()
                    .map(|(name, config)| (name.as_str(), config)),
            ),
        }
    }

    /// Get a specific project by name.
    /// For single project configs, returns the project if name is "default".
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        match self {
            Self::Single(config) if name == DEFAULT_PROJECT => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { projects } => projects.get(name),
        }
    }

    /// Pick the project a command should run against.
    ///
    /// An explicit name must exist. Without one, a single-project config
    /// yields its project, and a multi-project config yields its only
    /// project or the one named "default".
    pub fn select_project(&self, name: Option<&str>) -> Result<(&str, &ProjectConfig)> {
        if let Some(name) = name {
            return self
                .projects()
                .find(|(candidate, _)| *candidate == name)
                .ok_or_else(|| ConfigError::ProjectNotFound {
                    name: name.to_string(),
                    available: self.project_names(),
                });
        }

        if !self.is_multi_project() || self.project_count() == 1 {
            if let Some(only) = self.projects().next() {
                return Ok(only);
            }
        }

        self.get_project(DEFAULT_PROJECT)
            .map(|config| (DEFAULT_PROJECT, config))
            .ok_or_else(|| ConfigError::ProjectRequired {
                available: self.project_names(),
            })
    }

    /// Names of every project, ordered
    #[must_use]
    pub fn project_names(&self) -> Vec<String> {
        self.projects().map(|(name, _)| name.to_string()).collect()
    }

    /// Check if this is a multi-project configuration
    #[must_use]
    pub const fn is_multi_project(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    /// Get the number of projects
    #[must_use]
    pub fn project_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { projects } => projects.len(),
        }
    }
}

/// Configuration for a single GraphQL project
///
/// Keys this tool has no use for (such as `schema`) are accepted and
/// ignored so that an existing `.graphqlrc` can be shared with other tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Documents to lint (queries, mutations, fragments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsConfig>,

    /// Extra fragment sources that are resolved against but never linted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siblings: Option<DocumentsConfig>,

    /// File patterns to exclude from both `documents` and `siblings`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Tool-specific extensions (includes lint configuration)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl ProjectConfig {
    /// Get the lint configuration from extensions.
    ///
    /// Lint configuration should be specified under `extensions.lint`:
    /// ```yaml
    /// extensions:
    ///   lint:
    ///     rules:
    ///       selection_set_depth: [error, { maxDepth: 5 }]
    /// ```
    #[must_use]
    pub fn lint(&self) -> Option<&serde_json::Value> {
        self.extensions.as_ref().and_then(|ext| ext.get("lint"))
    }

    /// Files matched by `documents`, relative to `base_dir`
    pub fn resolve_documents(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        self.resolve(self.documents.as_ref(), base_dir)
    }

    /// Files matched by `siblings`, relative to `base_dir`
    pub fn resolve_siblings(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        self.resolve(self.siblings.as_ref(), base_dir)
    }

    fn resolve(&self, patterns: Option<&DocumentsConfig>, base_dir: &Path) -> Result<Vec<PathBuf>> {
        let Some(patterns) = patterns else {
            return Ok(Vec::new());
        };
        let exclude = self.exclude.as_deref().unwrap_or_default();
        files::find_files(base_dir, &patterns.patterns(), exclude)
    }
}

/// Documents source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentsConfig {
    /// Single pattern
    Pattern(String),
    /// Multiple patterns
    Patterns(Vec<String>),
}

impl DocumentsConfig {
    /// Get all document patterns
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Patterns(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}
