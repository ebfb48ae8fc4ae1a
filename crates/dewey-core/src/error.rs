//! Error types and exit codes for dewey
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing knowledge base root, unreadable config, etc.)
//!
//! Validator findings are never errors. They are reported as
//! [`Issue`](crate::validate::Issue) values; only operational failures end up here.

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the dewey binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing root, unreadable config (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during dewey operations
#[derive(Error, Debug)]
pub enum DeweyError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("knowledge base root not found: {root:?}")]
    RootNotFound { root: PathBuf },

    #[error("invalid config in {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl DeweyError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        DeweyError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        DeweyError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        DeweyError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            DeweyError::UsageError(_) | DeweyError::InvalidValue { .. } => ExitCode::Usage,

            DeweyError::RootNotFound { .. }
            | DeweyError::InvalidConfig { .. }
            | DeweyError::NotFound { .. } => ExitCode::Data,

            DeweyError::Io(_)
            | DeweyError::Json(_)
            | DeweyError::FailedOperationWithTarget { .. }
            | DeweyError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            DeweyError::UsageError(_) => "usage_error",
            DeweyError::InvalidValue { .. } => "invalid_value",
            DeweyError::RootNotFound { .. } => "root_not_found",
            DeweyError::InvalidConfig { .. } => "invalid_config",
            DeweyError::NotFound { .. } => "not_found",
            DeweyError::Io(_) => "io_error",
            DeweyError::Json(_) => "json_error",
            DeweyError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            DeweyError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for dewey operations
pub type Result<T> = std::result::Result<T, DeweyError>;
