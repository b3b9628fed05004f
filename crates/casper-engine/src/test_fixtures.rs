//! In-memory solving session for unit tests.
//!
//! Models a tiny slice of multi-shot behavior: grounding a section declares
//! its guard switches for that step, and a rule `guard -> head` derives
//! `head(step)` while `guard(step)` is switched on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::session::{ProgramPart, ShownAtoms, SolvingSession, Switch};

#[derive(Debug, Default)]
pub struct ScriptedSession {
    declares: HashMap<String, Vec<String>>,
    rules: Vec<(String, String)>,
    choices: Vec<String>,
    failing_part: Option<String>,
    switches: HashMap<Switch, bool>,
    pub loaded: Vec<PathBuf>,
    pub log: Vec<String>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grounding section `part` declares these guard names for its step.
    pub fn declare(mut self, part: &str, guards: &[&str]) -> Self {
        self.declares.insert(
            part.to_string(),
            guards.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    /// While `guard(t)` is on, `head(t)` is shown.
    pub fn rule(mut self, guard: &str, head: &str) -> Self {
        self.rules.push((guard.to_string(), head.to_string()));
        self
    }

    /// Each solve yields one model per choice atom instead of a single model.
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Grounding the named part (e.g. `step(2)`) fails.
    pub fn failing_on(mut self, part: &str) -> Self {
        self.failing_part = Some(part.to_string());
        self
    }

    pub fn is_on(&self, switch: &Switch) -> bool {
        self.switches.get(switch).copied().unwrap_or(false)
    }

    pub fn active_switches(&self) -> usize {
        self.switches.values().filter(|on| **on).count()
    }

    fn derived(&self) -> ShownAtoms {
        let mut atoms = Vec::new();
        for (switch, on) in &self.switches {
            if !on {
                continue;
            }
            for (guard, head) in &self.rules {
                if *guard == switch.name {
                    atoms.push(format!("{}({})", head, switch.step));
                }
            }
        }
        atoms
    }
}

impl SolvingSession for ScriptedSession {
    type Models<'a> = std::vec::IntoIter<EngineResult<ShownAtoms>>;

    fn solver_name(&self) -> String {
        "scripted".to_string()
    }

    fn load(&mut self, path: &Path) -> EngineResult<()> {
        self.log.push(format!("load {}", path.display()));
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn ground(&mut self, part: &ProgramPart) -> EngineResult<()> {
        let shown = part.to_string();
        if self.failing_part.as_deref() == Some(shown.as_str()) {
            return Err(EngineError::engine("grounding", format!("{shown} failed")));
        }
        self.log.push(format!("ground {shown}"));
        if let (Some(label), Some(guards)) = (&part.param, self.declares.get(&part.name)) {
            for guard in guards {
                self.switches
                    .entry(Switch::new(guard.clone(), label))
                    .or_insert(false);
            }
        }
        Ok(())
    }

    fn has_switch(&self, switch: &Switch) -> EngineResult<bool> {
        Ok(self.switches.contains_key(switch))
    }

    fn assign_switch(&mut self, switch: &Switch, enabled: bool) -> EngineResult<()> {
        self.log.push(format!("assign {switch}={enabled}"));
        match self.switches.get_mut(switch) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => Err(EngineError::engine("assign", format!("unknown switch {switch}"))),
        }
    }

    fn solve(&mut self) -> EngineResult<Self::Models<'_>> {
        self.log.push("solve".to_string());
        let atoms = self.derived();
        let models: Vec<EngineResult<ShownAtoms>> = if atoms.is_empty() {
            Vec::new()
        } else if self.choices.is_empty() {
            vec![Ok(atoms)]
        } else {
            self.choices
                .iter()
                .map(|choice| {
                    let mut model = atoms.clone();
                    model.push(choice.clone());
                    Ok(model)
                })
                .collect()
        };
        Ok(models.into_iter())
    }

    fn cleanup(&mut self) -> EngineResult<()> {
        self.log.push("cleanup".to_string());
        Ok(())
    }
}
