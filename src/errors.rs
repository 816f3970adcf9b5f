// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every layer returns [`RunnerError`]; the top-level entry point is the only
//! place that turns an error into a log line and an exit code.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Attempted path traversal: {0:?}")]
    PathTraversal(PathBuf),

    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    #[error("File not readable: {0:?}")]
    PermissionDenied(PathBuf),

    #[error("Invalid --extra-vars: {0}")]
    InvalidExtraVars(String),

    /// The child process ran and exited with a non-zero status.
    ///
    /// `stdout` / `stderr` hold everything the child wrote; the same lines
    /// were already streamed to the log while it ran.
    #[error("Process failed with exit code {code}")]
    Execution {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Process did not finish within {after:?} and was killed")]
    Timeout { after: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Coarse classification used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete configuration / CLI input.
    Validation,
    /// Missing, unreadable or out-of-tree file.
    Path,
    /// The child process failed (non-zero exit or deadline).
    Execution,
    /// Anything else, including launch failures.
    Unexpected,
}

impl RunnerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::Config(_)
            | RunnerError::ConfigIo { .. }
            | RunnerError::Toml(_)
            | RunnerError::Yaml(_) => ErrorKind::Validation,
            RunnerError::PathTraversal(_)
            | RunnerError::NotFound(_)
            | RunnerError::PermissionDenied(_) => ErrorKind::Path,
            RunnerError::Execution { .. } | RunnerError::Timeout { .. } => ErrorKind::Execution,
            RunnerError::InvalidExtraVars(_) | RunnerError::Io(_) | RunnerError::Unexpected(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Exit code of the child, if this error came from a finished process.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::Execution { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunnerError>;
