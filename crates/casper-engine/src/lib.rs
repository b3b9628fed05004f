//! Incremental multi-shot solving for CASPER.
//!
//! This crate drives an external grounder/solver through a sequence of
//! program "shots" while preserving solver state between them.
//!
//! ## Core Concepts
//!
//! - **SolvingSession**: the narrow load/ground/activate/solve/cleanup protocol
//!   the loop needs from an engine. One session per run, never shared.
//! - **ActivationSet**: guard switches (`use_linear(t)`, ...) toggled for one
//!   step; switches missing from the grounded program are skipped.
//! - **IncrementalSolver**: the base/step/check control loop.
//! - **ReportAggregator**: folds the run into the standard report document.
//!
//! ## Features
//!
//! - `clingo` - Enable [`ClingoSession`], a session over libclingo

mod activation;
mod aggregate;
mod clock;
mod error;
mod incremental;
mod session;

#[cfg(feature = "clingo")]
mod clingo_session;

#[cfg(test)]
mod test_fixtures;

pub use activation::{set_active, ActivationSet};
pub use aggregate::{ReportAggregator, WitnessMode};
pub use clock::{process_cpu_time, Stopwatch};
pub use error::{EngineError, EngineResult};
pub use incremental::{IncrementalInputs, IncrementalRun, IncrementalSolver, StepOutcome};
pub use session::{ProgramPart, ShownAtoms, SolvingSession, Switch};

#[cfg(feature = "clingo")]
pub use clingo_session::ClingoSession;
