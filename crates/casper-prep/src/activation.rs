//! Activation facts for one-shot solving.

use casper_core::{guards, StepPlan};

use crate::error::PrepResult;

/// Emit every step and check guard as a base fact for each step of the plan.
///
/// A one-shot solver run has no driver to toggle externals, so the facts
/// switch all guards on up front.
pub fn step_activation(facts_source: &str, source_name: &str) -> PrepResult<String> {
    let plan = StepPlan::extract(facts_source, source_name)?;

    let mut out = String::from("#program base.\n\n");
    for label in &plan {
        for guard in guards::all_guards() {
            out.push_str(&format!("{guard}({label}).\n"));
        }
        out.push('\n');
    }
    Ok(out)
}
