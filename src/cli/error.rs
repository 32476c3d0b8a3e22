//! CLI-level errors (wraps store errors)

use std::path::Path;

use thiserror::Error;

use crate::domain::StoreError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with path context.
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("{}: {}", action, path.display()),
            source,
        }
    }

    /// Create a JSON decoding error for the given input file.
    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            context: path.display().to_string(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Json { .. } => crate::exitcode::DATAERR,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Config { .. } => crate::exitcode::CONFIG,
            CliError::Store(e) => match e {
                StoreError::NotFound(_) => crate::exitcode::NOINPUT,
                StoreError::DuplicateId(_)
                | StoreError::OrphanedParent { .. }
                | StoreError::CycleDetected(_) => crate::exitcode::DATAERR,
            },
        }
    }
}
