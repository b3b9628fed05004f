//! Turning an incremental run into a report.

use std::fmt;
use std::str::FromStr;

use casper_core::{round_millis, Call, Report, Timing, Witness};
use serde::{Deserialize, Serialize};

use crate::incremental::IncrementalRun;

/// How step models become report witnesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WitnessMode {
    /// Union of every step's shown atoms as a single witness.
    #[default]
    Merged,
    /// One witness per model, in step order.
    PerModel,
}

impl FromStr for WitnessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merged" => Ok(WitnessMode::Merged),
            "per-model" | "per_model" => Ok(WitnessMode::PerModel),
            _ => Err(format!(
                "Unknown witness mode: {}. Use 'merged' or 'per-model'",
                s
            )),
        }
    }
}

impl fmt::Display for WitnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WitnessMode::Merged => f.write_str("merged"),
            WitnessMode::PerModel => f.write_str("per-model"),
        }
    }
}

/// Builds the single-call report of an incremental run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAggregator {
    mode: WitnessMode,
}

impl ReportAggregator {
    pub fn new(mode: WitnessMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WitnessMode {
        self.mode
    }

    /// The verdict is `SAT` exactly when at least one witness remains.
    /// Only total, solve and CPU time are measured; model and unsat stay zero.
    pub fn aggregate(&self, run: &IncrementalRun) -> Report {
        let witnesses = match self.mode {
            WitnessMode::PerModel => run.witnesses().cloned().collect(),
            WitnessMode::Merged if run.model_count() == 0 => Vec::new(),
            WitnessMode::Merged => vec![Witness::merged(run.witnesses())],
        };

        let total = round_millis(run.elapsed.as_secs_f64());
        let call = Call {
            start: 0.0,
            stop: total,
            witnesses,
        };
        let time = Timing {
            total,
            solve: round_millis(run.solve_time.as_secs_f64()),
            model: 0.0,
            unsat: 0.0,
            cpu: round_millis(run.cpu_time.as_secs_f64()),
        };

        Report::single_call(run.solver.clone(), run.inputs.display_paths(), call, time)
    }
}
