//! The solving session contract.
//!
//! A session is the single long-lived handle to the external grounder/solver.
//! It owns all grounded program state and is mutated in place across steps.
//! Sessions are never cloned; the incremental loop borrows one mutably for
//! the whole run.

use std::fmt;
use std::path::Path;

use casper_core::StepLabel;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Shown atoms of one model, in the order the engine reports them.
pub type ShownAtoms = Vec<String>;

/// A program section to ground, e.g. `base` or `step(3)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramPart {
    pub name: String,
    pub param: Option<StepLabel>,
}

impl ProgramPart {
    /// The parameterless `base` section.
    pub fn base() -> Self {
        Self {
            name: "base".to_string(),
            param: None,
        }
    }

    /// The `step(<label>)` section.
    pub fn step(label: &StepLabel) -> Self {
        Self {
            name: "step".to_string(),
            param: Some(label.clone()),
        }
    }

    /// The `check(<label>)` section.
    pub fn check(label: &StepLabel) -> Self {
        Self {
            name: "check".to_string(),
            param: Some(label.clone()),
        }
    }
}

impl fmt::Display for ProgramPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}({})", self.name, param),
            None => f.write_str(&self.name),
        }
    }
}

/// An addressable external atom: `name(step)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Switch {
    pub name: String,
    pub step: StepLabel,
}

impl Switch {
    pub fn new(name: impl Into<String>, step: &StepLabel) -> Self {
        Self {
            name: name.into(),
            step: step.clone(),
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.step)
    }
}

/// Narrow activation/solve/cleanup protocol over a grounder/solver.
pub trait SolvingSession {
    /// Models of one solve call: a lazy, finite, non-restartable sequence.
    type Models<'a>: Iterator<Item = EngineResult<ShownAtoms>> + 'a
    where
        Self: 'a;

    /// Human-readable solver identity, e.g. `clingo version 5.7.1`.
    fn solver_name(&self) -> String;

    /// Add a rule source to the session.
    fn load(&mut self, path: &Path) -> EngineResult<()>;

    /// Ground one program section.
    fn ground(&mut self, part: &ProgramPart) -> EngineResult<()>;

    /// Whether the grounded program currently contains the switch.
    fn has_switch(&self, switch: &Switch) -> EngineResult<bool>;

    /// Set the truth value of a switch known to exist.
    fn assign_switch(&mut self, switch: &Switch, enabled: bool) -> EngineResult<()>;

    /// Solve under the current program and switch assignment.
    fn solve(&mut self) -> EngineResult<Self::Models<'_>>;

    /// Release grounded rules that can no longer contribute.
    fn cleanup(&mut self) -> EngineResult<()>;
}
