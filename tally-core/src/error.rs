//! Error taxonomy shared by every ingestion stage.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while turning source files into canonical records.
///
/// None of these are recoverable inside the pipeline: a batch either fully
/// succeeds or fails before it reaches the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed date, period key or id; missing or ambiguous source file.
    #[error("validation error: {0}")]
    Validation(String),

    /// Subcategories in a batch that the category mapping does not know.
    #[error("subcategories missing from category mapping: {}", .missing.join(", "))]
    ConfigurationMismatch { missing: Vec<String> },

    /// Malformed split annotation, non-numeric amount, unreadable table data.
    #[error("parse error: {0}")]
    Parse(String),

    /// File system failure on a known path.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Prefix a row-level message with its source location.
    pub fn at(self, location: impl std::fmt::Display) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{location}: {msg}")),
            Self::Parse(msg) => Self::Parse(format!("{location}: {msg}")),
            other => other,
        }
    }

    /// Stable code for reporting at the command line.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ConfigurationMismatch { .. } => "CONFIGURATION_MISMATCH",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Io { .. } => "IO_ERROR",
        }
    }
}
