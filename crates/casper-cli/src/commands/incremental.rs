//! Incremental command implementation.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use casper_ops::{IncrementalRequest, OpsContext};

/// Run the incremental loop and print or save the report.
pub fn execute(
    ctx: &OpsContext,
    request: &IncrementalRequest,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let response = ctx.incremental(request)?;
    info!(steps = response.steps.len(), "Incremental run complete");

    let json = response.report.to_json_pretty()?;
    super::emit(output, &json)?;

    if let (Some(path), false) = (output, quiet) {
        eprintln!(
            "✅ {} step(s), {} model(s), {:?}",
            response.steps.len(),
            response.model_count(),
            response.report.result
        );
        eprintln!("💾 Saved to: {}", path.display());
    }
    Ok(())
}
