//! Error types for rule and fact preparation.

use casper_core::PlanError;
use thiserror::Error;

/// Result type for preparation utilities.
pub type PrepResult<T> = Result<T, PrepError>;

/// Errors raised while rewriting rule or fact sources.
#[derive(Debug, Error)]
pub enum PrepError {
    /// An observation fact could not be grouped.
    #[error("Line {line}: {message}")]
    Observation { line: usize, message: String },

    /// The source has no usable step plan.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// An internal pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
