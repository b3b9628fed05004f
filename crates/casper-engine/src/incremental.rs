//! The incremental (multi-shot) solve loop.
//!
//! One session is driven through the `base` section once, then through
//! `step(t)` and optionally `check(t)` for every label of the step plan:
//!
//! ```text
//! load base ─ ground base ─ load step/check
//!   for t in plan:
//!     ground step(t) ─ activate step guards
//!     [ground check(t) ─ activate check guards]
//!     solve ─ deactivate ─ cleanup
//! ```
//!
//! Guards must be off again before the next step grounds new rules, and
//! cleanup keeps solving cost proportional to the current step.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use casper_core::{StepLabel, StepPlan, Witness};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activation::ActivationSet;
use crate::clock::Stopwatch;
use crate::error::EngineResult;
use crate::session::{ProgramPart, SolvingSession, Switch};

/// Rule sources of an incremental run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementalInputs {
    /// Files loaded before the `base` section is grounded.
    pub base: Vec<PathBuf>,
    /// Files contributing `step(t)` rules.
    pub step: Vec<PathBuf>,
    /// Files contributing `check(t)` rules; the check phase runs only when non-empty.
    #[serde(default)]
    pub check: Vec<PathBuf>,
}

impl IncrementalInputs {
    pub fn new(base: Vec<PathBuf>, step: Vec<PathBuf>) -> Self {
        Self {
            base,
            step,
            check: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: Vec<PathBuf>) -> Self {
        self.check = check;
        self
    }

    pub fn has_check(&self) -> bool {
        !self.check.is_empty()
    }

    /// All inputs as display strings: base, step, then check files.
    pub fn display_paths(&self) -> Vec<String> {
        self.base
            .iter()
            .chain(&self.step)
            .chain(&self.check)
            .map(|p| p.display().to_string())
            .collect()
    }
}

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub label: StepLabel,
    /// One witness per model, in enumeration order.
    pub witnesses: Vec<Witness>,
    /// Number of guard switches that existed and were switched on.
    pub activated: usize,
    pub solve_time: Duration,
}

/// Everything an incremental run produced, before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalRun {
    pub solver: String,
    pub inputs: IncrementalInputs,
    pub steps: Vec<StepOutcome>,
    /// Wall clock from before the first ground call to after the last cleanup.
    pub elapsed: Duration,
    /// Sum of all solve calls.
    pub solve_time: Duration,
    pub cpu_time: Duration,
}

impl IncrementalRun {
    /// Total number of models over all steps.
    pub fn model_count(&self) -> usize {
        self.steps.iter().map(|s| s.witnesses.len()).sum()
    }

    /// All witnesses in step order.
    pub fn witnesses(&self) -> impl Iterator<Item = &Witness> {
        self.steps.iter().flat_map(|s| s.witnesses.iter())
    }
}

/// Drives one exclusively borrowed session through a step plan.
pub struct IncrementalSolver<'s, S: SolvingSession> {
    session: &'s mut S,
}

impl<'s, S: SolvingSession> IncrementalSolver<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    /// Run the whole plan. Any engine failure aborts the run.
    pub fn run(
        mut self,
        plan: &StepPlan,
        inputs: &IncrementalInputs,
    ) -> EngineResult<IncrementalRun> {
        let watch = Stopwatch::start();

        for path in &inputs.base {
            self.session.load(path)?;
        }
        self.session.ground(&ProgramPart::base())?;
        debug!(files = inputs.base.len(), "Base section grounded");

        for path in inputs.step.iter().chain(&inputs.check) {
            self.session.load(path)?;
        }

        let mut steps = Vec::with_capacity(plan.len());
        let mut solve_time = Duration::ZERO;
        for label in plan {
            let outcome = self.run_step(label, inputs.has_check())?;
            solve_time += outcome.solve_time;
            info!(
                step = %label,
                models = outcome.witnesses.len(),
                activated = outcome.activated,
                "Step solved"
            );
            steps.push(outcome);
        }

        Ok(IncrementalRun {
            solver: self.session.solver_name(),
            inputs: inputs.clone(),
            steps,
            elapsed: watch.elapsed(),
            solve_time,
            cpu_time: watch.cpu_elapsed(),
        })
    }

    fn run_step(&mut self, label: &StepLabel, with_check: bool) -> EngineResult<StepOutcome> {
        self.session.ground(&ProgramPart::step(label))?;
        let mut active: Vec<Switch> =
            ActivationSet::STEP.set_active(&mut *self.session, label, true)?;

        if with_check {
            self.session.ground(&ProgramPart::check(label))?;
            active.extend(ActivationSet::CHECK.set_active(&mut *self.session, label, true)?);
        }

        let started = Instant::now();
        let mut witnesses = Vec::new();
        for model in self.session.solve()? {
            witnesses.push(Witness::from_atoms(model?));
        }
        let solve_time = started.elapsed();

        for switch in &active {
            self.session.assign_switch(switch, false)?;
        }
        self.session.cleanup()?;

        Ok(StepOutcome {
            label: label.clone(),
            witnesses,
            activated: active.len(),
            solve_time,
        })
    }
}
