//! Meta-event recomputation over solver subprocesses.
//!
//! Every witness of a report is re-solved on its own: its atoms become a
//! temporary fact file, one solver process derives the meta-events, and the
//! first model replaces the witness value. Failures degrade that witness
//! only.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use casper_core::{round_millis, Report, Witness};
use futures::stream::{self, StreamExt};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{OpsError, OpsResult};

/// Solver exit codes accepted as a successful run (plain, SAT, exhausted).
/// UNSAT (20) degrades the witness like any other failure.
const ACCEPTED_EXIT_CODES: [i32; 3] = [0, 10, 30];

/// What one witness's subprocess produced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WitnessOutcome {
    pub value: Vec<String>,
    /// Solver-reported wall time in seconds.
    pub total: f64,
    /// Solver-reported CPU time in seconds.
    pub cpu: f64,
    pub degraded: bool,
}

impl WitnessOutcome {
    fn degraded() -> Self {
        Self {
            value: Vec::new(),
            total: 0.0,
            cpu: 0.0,
            degraded: true,
        }
    }
}

/// Runs the meta-event program for single witnesses.
#[derive(Debug, Clone)]
pub(crate) struct MetaRunner {
    pub clingo_bin: PathBuf,
    pub base_files: Vec<PathBuf>,
    pub meta_event: PathBuf,
    pub unit: String,
    pub timeout: Option<Duration>,
}

impl MetaRunner {
    /// Recompute all witnesses with at most `threads` subprocesses in flight.
    /// Outcomes keep the input order.
    pub async fn recompute_all(&self, witnesses: &[Witness], threads: usize) -> Vec<WitnessOutcome> {
        stream::iter(witnesses.iter().enumerate())
            .map(|(index, witness)| self.recompute(index, witness))
            .buffered(threads)
            .collect()
            .await
    }

    async fn recompute(&self, index: usize, witness: &Witness) -> WitnessOutcome {
        match self.try_recompute(witness).await {
            Ok(outcome) => {
                debug!(
                    witness = index,
                    atoms = outcome.value.len(),
                    time = outcome.total,
                    "Witness recomputed"
                );
                outcome
            }
            Err(e) => {
                warn!(witness = index, error = %e, "Meta-event recomputation failed, using empty value");
                WitnessOutcome::degraded()
            }
        }
    }

    async fn try_recompute(&self, witness: &Witness) -> OpsResult<WitnessOutcome> {
        let facts = write_fact_file(&witness.value)?;

        let mut command = Command::new(&self.clingo_bin);
        command
            .arg("--outf=2")
            .arg("-c")
            .arg(format!("unit={}", self.unit))
            .args(&self.base_files)
            .arg(&self.meta_event)
            .arg(facts.path())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    OpsError::with_context(
                        "meta-event solve",
                        format!("timed out after {:.3}s", limit.as_secs_f64()),
                    )
                })??,
            None => command.output().await?,
        };

        let accepted = output
            .status
            .code()
            .is_some_and(|code| ACCEPTED_EXIT_CODES.contains(&code));
        if !accepted {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OpsError::with_context(
                "meta-event solve",
                format!("solver exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let report: Report = serde_json::from_slice(&output.stdout)?;
        let value = report
            .first_model()
            .map(|atoms| Witness::from_atoms(atoms.iter().cloned()).value)
            .unwrap_or_default();

        Ok(WitnessOutcome {
            value,
            total: report.time.total,
            cpu: report.time.cpu,
            degraded: false,
        })
    }
}

/// One `atom.` per line.
fn fact_source(atoms: &[String]) -> String {
    atoms
        .iter()
        .map(|atom| format!("{atom}."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_fact_file(atoms: &[String]) -> OpsResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("casper-witness-")
        .suffix(".lp")
        .tempfile()?;
    file.write_all(fact_source(atoms).as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Write outcomes back into the report.
///
/// Witness times grow by their recomputation time; the call stop time and
/// the aggregate total/CPU are replaced by the pass's running totals.
pub(crate) fn apply_outcomes(
    report: &mut Report,
    outcomes: Vec<WitnessOutcome>,
    meta_event: &Path,
    stale_marker: &str,
) {
    let (total, cpu) = outcomes
        .iter()
        .fold((0.0, 0.0), |(total, cpu), o| (total + o.total, cpu + o.cpu));

    if let Some(call) = report.call.first_mut() {
        for (witness, outcome) in call.witnesses.iter_mut().zip(outcomes) {
            witness.value = outcome.value;
            witness.time = round_millis(witness.time + round_millis(outcome.total));
        }
        call.stop = round_millis(total);
    }
    report.time.total = round_millis(total);
    report.time.cpu = round_millis(cpu);

    if !stale_marker.is_empty() {
        report.input.retain(|entry| !entry.contains(stale_marker));
    }
    report.input.push(meta_event.display().to_string());
}
