//! Error types for the operations layer.

use std::path::PathBuf;

use casper_core::PlanError;
use casper_engine::EngineError;
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The step plan could not be extracted.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The solving engine failed during an incremental run.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A report file is not valid report JSON.
    #[error("Malformed report {path}: {source}")]
    MalformedReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A report file has no `Call` entry to work on.
    #[error("Report {path} contains no Call entry")]
    EmptyReport { path: PathBuf },

    /// Worker pool size must be positive.
    #[error("Invalid thread count {0}: must be at least 1")]
    InvalidThreads(usize),

    /// Incremental solving needs a solver backend compiled in.
    #[error("Incremental solving requires the 'clingo' feature. Rebuild with: cargo build --features clingo")]
    BackendUnavailable,

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context.
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl OpsError {
    /// Create a new error with additional context.
    pub fn with_context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: message.into(),
        }
    }
}
