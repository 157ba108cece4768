use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported config file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid config in {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("project '{name}' not found (available: {})", .available.join(", "))]
    ProjectNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("config defines several projects, choose one of: {}", .available.join(", "))]
    ProjectRequired { available: Vec<String> },

    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}
