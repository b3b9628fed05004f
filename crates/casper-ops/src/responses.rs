//! Response DTOs for operations.

use casper_core::{Report, StepLabel};
use serde::{Deserialize, Serialize};

/// Response from an incremental run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalResponse {
    /// The aggregated report.
    pub report: Report,

    /// Step labels in the order they were solved.
    pub steps: Vec<StepLabel>,
}

impl IncrementalResponse {
    /// Number of witnesses in the report.
    pub fn model_count(&self) -> usize {
        self.report.models.number
    }
}

/// Response from a meta-event recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEventResponse {
    /// The rewritten report.
    pub report: Report,

    /// Witnesses whose subprocess completed.
    pub recomputed: usize,

    /// Witnesses whose subprocess failed and were left empty.
    pub degraded: usize,
}

impl MetaEventResponse {
    /// Whether every witness was recomputed.
    pub fn is_complete(&self) -> bool {
        self.degraded == 0
    }
}
