//! Error types for the solving engine layer.

use casper_core::PlanError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving a solving session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The step plan could not be extracted.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The solving engine reported a failure.
    #[error("solving engine failed during {context}: {message}")]
    Engine { context: String, message: String },

    /// The session lost its engine handle after an earlier failure.
    #[error("solving session is no longer usable after a failed solve")]
    SessionPoisoned,

    /// I/O error (file operations).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create an engine failure for the given phase.
    pub fn engine(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            context: context.into(),
            message: message.into(),
        }
    }
}
