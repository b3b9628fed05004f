//! libclingo-backed solving session.
//!
//! Wraps one multi-shot `clingo::Control`. Solving hands the control to a
//! solve handle and takes it back on close; if that round trip fails the
//! session is poisoned and every later call reports it.
//!
//! Program files are added as text under `base`; `#program` directives in
//! the text switch sections as they would when loading the file directly.

use std::fs;
use std::path::Path;

use casper_core::StepLabel;
use clingo::{
    ClingoError, Control, Part, ShowType, Signature, SolveMode, SolverLiteral, Symbol, TruthValue,
};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::session::{ProgramPart, ShownAtoms, SolvingSession, Switch};

impl From<ClingoError> for EngineError {
    fn from(err: ClingoError) -> Self {
        EngineError::engine("clingo call", err.to_string())
    }
}

/// A solving session over libclingo.
pub struct ClingoSession {
    control: Option<Control>,
}

impl ClingoSession {
    /// Create a control object with command-line style solver arguments,
    /// e.g. `["--models=0"]`.
    pub fn new(arguments: Vec<String>) -> EngineResult<Self> {
        debug!(?arguments, "Creating clingo control");
        let control = clingo::control(arguments)?;
        Ok(Self {
            control: Some(control),
        })
    }

    fn control(&self) -> EngineResult<&Control> {
        self.control.as_ref().ok_or(EngineError::SessionPoisoned)
    }

    fn control_mut(&mut self) -> EngineResult<&mut Control> {
        self.control.as_mut().ok_or(EngineError::SessionPoisoned)
    }

    /// Only atoms of the switch's own `name/1` signature are visited.
    fn literal_of(&self, switch: &Switch) -> EngineResult<Option<SolverLiteral>> {
        let symbol = switch_symbol(switch)?;
        let signature = Signature::new(&switch.name, 1, true)?;
        let atoms = self.control()?.symbolic_atoms()?;
        for atom in atoms.iter_with_signature(signature)? {
            if atom.symbol()? == symbol {
                return Ok(Some(atom.literal()?));
            }
        }
        Ok(None)
    }
}

fn label_symbol(label: &StepLabel) -> EngineResult<Symbol> {
    match label {
        StepLabel::Number(n) => Ok(Symbol::create_number(*n)),
        StepLabel::Symbol(name) => Ok(Symbol::create_id(name, true)?),
    }
}

fn switch_symbol(switch: &Switch) -> EngineResult<Symbol> {
    let arg = label_symbol(&switch.step)?;
    Ok(Symbol::create_function(&switch.name, &[arg], true)?)
}

impl SolvingSession for ClingoSession {
    type Models<'a> = std::vec::IntoIter<EngineResult<ShownAtoms>>;

    fn solver_name(&self) -> String {
        let (major, minor, revision) = clingo::version();
        format!("clingo version {major}.{minor}.{revision}")
    }

    fn load(&mut self, path: &Path) -> EngineResult<()> {
        let program = fs::read_to_string(path)?;
        self.control_mut()?
            .add("base", &[], &program)
            .map_err(|e| EngineError::engine(format!("load {}", path.display()), e.to_string()))
    }

    fn ground(&mut self, part: &ProgramPart) -> EngineResult<()> {
        let params = match &part.param {
            Some(label) => vec![label_symbol(label)?],
            None => Vec::new(),
        };
        let clingo_part = Part::new(&part.name, params)?;
        self.control_mut()?
            .ground(&[clingo_part])
            .map_err(|e| EngineError::engine(format!("ground {part}"), e.to_string()))
    }

    fn has_switch(&self, switch: &Switch) -> EngineResult<bool> {
        Ok(self.literal_of(switch)?.is_some())
    }

    fn assign_switch(&mut self, switch: &Switch, enabled: bool) -> EngineResult<()> {
        let literal = self
            .literal_of(switch)?
            .ok_or_else(|| EngineError::engine("assign", format!("{switch} is not grounded")))?;
        let value = if enabled {
            TruthValue::True
        } else {
            TruthValue::False
        };
        Ok(self.control_mut()?.assign_external(literal, value)?)
    }

    /// Models are drained eagerly: the solve handle owns the control until it
    /// is closed, so it cannot outlive this call.
    fn solve(&mut self) -> EngineResult<Self::Models<'_>> {
        let control = self.control.take().ok_or(EngineError::SessionPoisoned)?;
        let mut handle = control
            .solve(SolveMode::YIELD, &[])
            .map_err(|e| EngineError::engine("solve", e.to_string()))?;

        let mut models = Vec::new();
        loop {
            handle.resume()?;
            match handle.model()? {
                Some(model) => {
                    let atoms = model
                        .symbols(ShowType::SHOWN)?
                        .iter()
                        .map(|symbol| symbol.to_string())
                        .collect();
                    models.push(Ok(atoms));
                }
                None => break,
            }
        }

        self.control = Some(handle.close()?);
        Ok(models.into_iter())
    }

    fn cleanup(&mut self) -> EngineResult<()> {
        self.control_mut()?
            .cleanup()
            .map_err(|e| EngineError::engine("cleanup", e.to_string()))
    }
}
