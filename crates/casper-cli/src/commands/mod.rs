//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};

pub mod config;
pub mod incremental;
pub mod meta;
pub mod prep;

/// Write `text` to `output`, or to stdout when there is none.
pub fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    let text = if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    };
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
