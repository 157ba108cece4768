use crate::{ConfigError, DocumentsConfig, GraphQLConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names looked up in each directory, most preferred first
const CONFIG_FILES: &[&str] = &[
    ".graphqlrc.yml",
    ".graphqlrc.yaml",
    ".graphqlrc.json",
    ".graphqlrc",
    "graphql.config.yml",
    "graphql.config.yaml",
    "graphql.config.json",
];

/// Syntax of a config file, decided from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
    /// Extensionless `.graphqlrc`: YAML, falling back to JSON
    Graphqlrc,
}

impl ConfigFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            Some(_) => None,
            None => (path.file_name().and_then(|name| name.to_str()) == Some(".graphqlrc"))
                .then_some(Self::Graphqlrc),
        }
    }

    fn parse(self, contents: &str, path: &Path) -> Result<GraphQLConfig> {
        let invalid = |syntax: &str, error: &dyn std::fmt::Display| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("{syntax} parse error: {error}"),
        };
        let yaml = || {
            serde_yaml::from_str::<GraphQLConfig>(contents).map_err(|e| invalid("YAML", &e))
        };
        let json = || {
            serde_json::from_str::<GraphQLConfig>(contents).map_err(|e| invalid("JSON", &e))
        };

        match self {
            Self::Yaml => yaml(),
            Self::Json => json(),
            Self::Graphqlrc => yaml().or_else(|_| json()),
        }
    }
}

/// Find the nearest config file in `start_dir` or one of its ancestors.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    for (depth, dir) in start_dir.ancestors().enumerate() {
        tracing::trace!(dir = %dir.display(), "Looking for config files");
        if let Some(path) = CONFIG_FILES
            .iter()
            .map(|file_name| dir.join(file_name))
            .find(|candidate| candidate.is_file())
        {
            tracing::info!(path = %path.display(), depth, "Found config file");
            return Ok(Some(path));
        }
    }

    tracing::debug!("No config file found");
    Ok(None)
}

/// Read and validate the config file at `path`.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GraphQLConfig> {
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        projects = config.project_count(),
        multi_project = config.is_multi_project(),
        "Loaded config"
    );
    Ok(config)
}

/// Parse and validate config text. `path` picks the syntax and is
/// reported in errors; it is never read.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GraphQLConfig> {
    let format = ConfigFormat::detect(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    tracing::debug!(?format, "Parsing config");

    let config = format.parse(contents, path)?;
    validate_config(&config, path)?;
    Ok(config)
}

/// Validate the loaded configuration
#[tracing::instrument(skip(config, path), fields(path = %path.display(), projects = config.project_count()))]
fn validate_config(config: &GraphQLConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    if config.project_count() == 0 {
        return Err(invalid("'projects' must define at least one project".to_string()));
    }

    for (project_name, project_config) in config.projects() {
        tracing::trace!(project = project_name, "Validating project config");

        let pattern_sets = [
            ("documents", project_config.documents.as_ref()),
            ("siblings", project_config.siblings.as_ref()),
        ];
        for (key, patterns) in pattern_sets {
            let Some(patterns) = patterns.map(DocumentsConfig::patterns) else {
                continue;
            };

            if patterns.is_empty() {
                return Err(invalid(format!(
                    "Project '{project_name}' has empty {key} configuration"
                )));
            }
            if patterns.iter().any(|pattern| pattern.trim().is_empty()) {
                return Err(invalid(format!(
                    "Project '{project_name}' has empty {key} pattern"
                )));
            }
        }

        if let Some(lint) = project_config.lint() {
            if !lint.is_object() {
                return Err(invalid(format!(
                    "Project '{project_name}' has a non-object 'extensions.lint' value"
                )));
            }
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
