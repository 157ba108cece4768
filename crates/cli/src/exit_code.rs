//! Exit codes for the GraphQL depth CLI.
//!
//! This module defines distinct exit codes for different error types,
//! allowing scripts and CI systems to distinguish between different
//! failure modes.

use graphql_config::ConfigError;
use graphql_linter::{LintConfigError, RuleOptionsError};

/// Exit codes used by the CLI.
///
/// These follow standard Unix conventions where 0 indicates success
/// and non-zero values indicate different types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// Error-severity lint diagnostics were reported
    LintError = 1,
    /// Configuration error (missing or invalid config file or rule options)
    ConfigError = 2,
    /// I/O error (file read failure)
    IoError = 4,
    /// Parse error (invalid GraphQL syntax in a linted document)
    ParseError = 5,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classify an error by the first recognized cause in its chain.
    ///
    /// Errors that carry no recognized cause are treated as I/O failures.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(failure) = cause.downcast_ref::<Failure>() {
                return failure.code;
            }
            if let Some(config_error) = cause.downcast_ref::<ConfigError>() {
                return match config_error {
                    ConfigError::Io(_) => Self::IoError,
                    _ => Self::ConfigError,
                };
            }
            if cause.is::<LintConfigError>()
                || cause.is::<RuleOptionsError>()
                || cause.is::<serde_json::Error>()
            {
                return Self::ConfigError;
            }
            if cause.is::<std::io::Error>() {
                return Self::IoError;
            }
        }
        Self::IoError
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::LintError => write!(f, "lint error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::IoError => write!(f, "I/O error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}

/// An error that decides its own exit code
#[derive(Debug)]
pub struct Failure {
    code: ExitCode,
    message: String,
}

impl Failure {
    pub fn new(code: ExitCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}
