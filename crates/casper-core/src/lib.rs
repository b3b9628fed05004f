//! Core domain types shared across the CASPER workspace.
//!
//! - **Step plans**: the ordered step labels declared by `#program step(<label>).`
//!   headers of a facts program ([`StepPlan`]).
//! - **Guard switches**: the fixed external atom names toggled per step ([`guards`]).
//! - **Reports**: the JSON result document produced by incremental runs and
//!   rewritten by the meta-event pass ([`Report`]).

pub mod guards;
mod report;
mod step;

pub use report::{round_millis, Call, Models, Report, Timing, Verdict, Witness};
pub use step::{parse_program_directive, PlanError, PlanResult, StepLabel, StepPlan};
