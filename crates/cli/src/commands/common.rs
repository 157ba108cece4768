use crate::exit_code::{ExitCode, Failure};
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_config::{GraphQLConfig, ProjectConfig};
use graphql_linter::LintConfig;
use graphql_syntax::{Document, LineIndex, Parse};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The selected project of a loaded config file
pub struct CommandContext {
    pub project_name: String,
    pub project: ProjectConfig,
    /// Directory holding the config file; project patterns are relative to it
    pub base_dir: PathBuf,
}

impl CommandContext {
    /// Load the config named by `--config`, or the nearest one above the
    /// working directory.
    ///
    /// Returns `None` when no config file exists and none was requested.
    pub fn load(config_path: Option<PathBuf>, project_name: Option<&str>) -> Result<Option<Self>> {
        let config_path = match config_path {
            Some(path) => path,
            None => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                match graphql_config::find_config(&cwd).context("Failed to search for config")? {
                    Some(path) => path,
                    None if project_name.is_some() => {
                        return Err(Failure::new(
                            ExitCode::ConfigError,
                            "--project was given but no GraphQL config file was found",
                        )
                        .into());
                    }
                    None => {
                        tracing::debug!("No config file found, using command line options only");
                        return Ok(None);
                    }
                }
            }
        };

        let config: GraphQLConfig = graphql_config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        let (name, project) = config.select_project(project_name)?;

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        tracing::info!(project = name, base_dir = %base_dir.display(), "Project selected");
        Ok(Some(Self {
            project_name: name.to_string(),
            project: project.clone(),
            base_dir,
        }))
    }

    /// The project's `extensions.lint` section, or an empty config
    pub fn lint_config(&self) -> Result<LintConfig> {
        let Some(lint_value) = self.project.lint() else {
            tracing::debug!("No lint configuration found in project config");
            return Ok(LintConfig::default());
        };

        tracing::debug!("Raw lint configuration: {lint_value:?}");
        let lint_config: LintConfig = serde_json::from_value(lint_value.clone())
            .with_context(|| {
                format!(
                    "Invalid lint configuration in project '{}'",
                    self.project_name
                )
            })?;
        lint_config.validate()?;
        Ok(lint_config)
    }
}

/// A GraphQL file read from disk and parsed
pub struct SourceFile {
    pub path: PathBuf,
    /// The path as shown in output
    pub display: String,
    pub text: String,
    pub parse: Parse,
}

impl SourceFile {
    pub fn read(path: &Path, cwd: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parse = graphql_syntax::parse(&text);
        let display = path
            .strip_prefix(cwd)
            .unwrap_or(path)
            .display()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            display,
            text,
            parse,
        })
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }
}

/// The documents a command reports on, and the fragment-only sources
/// next to them.
pub struct DocumentSet {
    pub documents: Vec<SourceFile>,
    pub siblings: Vec<SourceFile>,
}

impl DocumentSet {
    /// Read the explicit `files`, or the project's `documents` when none are
    /// given, plus every sibling matched by the project's `siblings` and by
    /// `extra_siblings` (relative to the working directory).
    ///
    /// A file that is both a document and a sibling is only a document.
    pub fn load(
        ctx: Option<&CommandContext>,
        files: &[PathBuf],
        extra_siblings: &[String],
        show_info: bool,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let document_paths = if files.is_empty() {
            let Some(ctx) = ctx.filter(|ctx| ctx.project.documents.is_some()) else {
                return Err(Failure::new(
                    ExitCode::ConfigError,
                    "No documents to check: pass files or configure `documents` in a GraphQL config",
                )
                .into());
            };
            ctx.project.resolve_documents(&ctx.base_dir)?
        } else {
            files.to_vec()
        };

        let mut sibling_paths = match ctx {
            Some(ctx) => ctx.project.resolve_siblings(&ctx.base_dir)?,
            None => Vec::new(),
        };
        if !extra_siblings.is_empty() {
            let patterns: Vec<&str> = extra_siblings.iter().map(String::as_str).collect();
            sibling_paths.extend(graphql_config::find_files(&cwd, &patterns, &[])?);
        }

        let mut seen: HashSet<PathBuf> = document_paths.iter().map(|p| canonical(p)).collect();
        sibling_paths.retain(|path| seen.insert(canonical(path)));

        tracing::info!(
            documents = document_paths.len(),
            siblings = sibling_paths.len(),
            "Resolved files"
        );

        let documents = document_paths
            .iter()
            .map(|path| SourceFile::read(path, &cwd))
            .collect::<Result<Vec<_>>>()?;
        let siblings = sibling_paths
            .iter()
            .map(|path| SourceFile::read(path, &cwd))
            .collect::<Result<Vec<_>>>()?;

        for sibling in siblings.iter().filter(|s| s.parse.has_errors()) {
            tracing::warn!(path = %sibling.path.display(), "Sibling document has syntax errors");
            if show_info {
                eprintln!(
                    "{} {} has syntax errors, using its recoverable fragments",
                    "warning:".yellow().bold(),
                    sibling.display
                );
            }
        }

        Ok(Self {
            documents,
            siblings,
        })
    }

    /// Every document fragment spreads of `documents[index]` may resolve
    /// through, besides itself: the other documents, then the siblings.
    pub fn fragment_sources(&self, index: usize) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
            .map(|(_, source)| source)
            .chain(&self.siblings)
            .map(|source| source.parse.document())
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
