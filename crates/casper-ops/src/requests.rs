//! Request DTOs for operations.
//!
//! Each request carries everything one operation needs, so the CLI and
//! programmatic callers build the same values.

use std::path::PathBuf;
use std::time::Duration;

use casper_engine::WitnessMode;
use serde::{Deserialize, Serialize};

/// Request to run the incremental base/step/check loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalRequest {
    /// Program whose `#program step(..).` headers define the step plan.
    pub facts: PathBuf,

    /// Files grounded once in the base section.
    pub base: Vec<PathBuf>,

    /// Files providing the step section.
    pub step: Vec<PathBuf>,

    /// Files providing the optional check section.
    #[serde(default)]
    pub check: Vec<PathBuf>,

    /// Solver arguments; `None` uses the configured ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clingo_args: Option<Vec<String>>,

    /// How step models become report witnesses.
    #[serde(default)]
    pub witness_mode: WitnessMode,
}

impl IncrementalRequest {
    /// Create a request without check files.
    pub fn new(facts: impl Into<PathBuf>, base: Vec<PathBuf>, step: Vec<PathBuf>) -> Self {
        Self {
            facts: facts.into(),
            base,
            step,
            check: vec![],
            clingo_args: None,
            witness_mode: WitnessMode::default(),
        }
    }

    /// Set check files.
    pub fn with_check(mut self, check: Vec<PathBuf>) -> Self {
        self.check = check;
        self
    }

    /// Override the solver arguments.
    pub fn with_clingo_args(mut self, args: Vec<String>) -> Self {
        self.clingo_args = Some(args);
        self
    }

    /// Set the witness mode.
    pub fn with_witness_mode(mut self, mode: WitnessMode) -> Self {
        self.witness_mode = mode;
        self
    }
}

/// Request to recompute meta-events for every witness of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEventRequest {
    /// Rule files passed to every solver subprocess.
    pub base_files: Vec<PathBuf>,

    /// Rules deriving meta-events from a witness's facts.
    pub meta_event: PathBuf,

    /// Report produced by an earlier run.
    pub report_path: PathBuf,

    /// Worker pool size; `None` uses the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Time unit constant; `None` uses the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Per-subprocess timeout; `None` uses the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl MetaEventRequest {
    /// Create a request with configured defaults.
    pub fn new(
        base_files: Vec<PathBuf>,
        meta_event: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_files,
            meta_event: meta_event.into(),
            report_path: report_path.into(),
            threads: None,
            unit: None,
            timeout: None,
        }
    }

    /// Set the worker pool size.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the time unit constant.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the per-subprocess timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
