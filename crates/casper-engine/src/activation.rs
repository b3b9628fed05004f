//! External activation: toggling guard switches for one step.
//!
//! Grounding is step dependent, so a guard only exists when rules mentioning
//! it were grounded for that step. Absent switches are skipped after a
//! capability query rather than treated as errors.

use casper_core::guards::{CHECK_GUARDS, STEP_GUARDS};
use casper_core::StepLabel;
use tracing::{debug, trace};

use crate::error::EngineResult;
use crate::session::{SolvingSession, Switch};

/// A named list of guard switches toggled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationSet {
    pub name: &'static str,
    pub switches: &'static [&'static str],
}

impl ActivationSet {
    /// Guards of the `step(t)` section.
    pub const STEP: Self = Self {
        name: "step",
        switches: &STEP_GUARDS,
    };

    /// Guards of the `check(t)` section.
    pub const CHECK: Self = Self {
        name: "check",
        switches: &CHECK_GUARDS,
    };

    /// Switch instances of this set for a step.
    pub fn switches_for<'a>(&'a self, step: &'a StepLabel) -> impl Iterator<Item = Switch> + 'a {
        self.switches.iter().map(move |name| Switch::new(*name, step))
    }

    /// Toggle every switch of the set that exists in the session.
    ///
    /// Returns the switches that were actually assigned.
    pub fn set_active<S: SolvingSession>(
        &self,
        session: &mut S,
        step: &StepLabel,
        enabled: bool,
    ) -> EngineResult<Vec<Switch>> {
        let toggled = set_active(session, self.switches, step, enabled)?;
        debug!(
            set = self.name,
            step = %step,
            enabled,
            toggled = toggled.len(),
            "Activation set applied"
        );
        Ok(toggled)
    }
}

/// Toggle `names` keyed by `step`, skipping switches the grounded program lacks.
pub fn set_active<S: SolvingSession>(
    session: &mut S,
    names: &[&str],
    step: &StepLabel,
    enabled: bool,
) -> EngineResult<Vec<Switch>> {
    let mut toggled = Vec::with_capacity(names.len());
    for name in names {
        let switch = Switch::new(*name, step);
        if !session.has_switch(&switch)? {
            trace!(switch = %switch, "Switch not grounded, skipping");
            continue;
        }
        session.assign_switch(&switch, enabled)?;
        toggled.push(switch);
    }
    Ok(toggled)
}
