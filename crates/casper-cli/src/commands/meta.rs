//! Meta-event recomputation command implementation.

use std::path::Path;

use anyhow::Result;

use casper_ops::{MetaEventRequest, OpsContext};

/// Recompute meta-events and print or save the rewritten report.
pub async fn execute(
    ctx: &OpsContext,
    request: &MetaEventRequest,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let response = ctx.recompute_meta_events(request).await?;

    let json = response.report.to_json_pretty()?;
    super::emit(output, &json)?;

    if let (Some(path), false) = (output, quiet) {
        eprintln!("✅ Recomputed {} witness(es)", response.recomputed);
        if !response.is_complete() {
            eprintln!("⚠️  {} witness(es) left empty", response.degraded);
        }
        eprintln!("💾 Saved to: {}", path.display());
    }
    Ok(())
}
