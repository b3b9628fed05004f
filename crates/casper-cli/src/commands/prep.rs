//! Prep command implementations.
//!
//! Each command reads one file and writes the rewritten text; `-` as output
//! means stdout.

use std::path::Path;

use anyhow::{Context, Result};

use casper_prep::{
    filter_observations, group_observations, step_activation, wrap_atemporal, wrap_meta_events,
    wrap_simple_events,
};

fn read(input: &Path) -> Result<String> {
    std::fs::read_to_string(input)
        .with_context(|| format!("Input file '{}' does not exist or is unreadable", input.display()))
}

fn write(output: &Path, text: &str) -> Result<()> {
    if output == Path::new("-") {
        print!("{text}");
        Ok(())
    } else {
        std::fs::write(output, text)
            .with_context(|| format!("Failed to write {}", output.display()))
    }
}

pub fn observations(input: &Path, output: &Path, preserve_order: bool) -> Result<()> {
    let text = group_observations(&read(input)?, preserve_order)?;
    write(output, &text)
}

pub fn filter(input: &Path, output: &Path, start: i64, end: i64) -> Result<()> {
    let text = filter_observations(&read(input)?, start, end)?;
    write(output, &text)
}

pub fn atemporal(input: &Path, output: &Path) -> Result<()> {
    write(output, &wrap_atemporal(&read(input)?))
}

pub fn simple_events(input: &Path, output: &Path) -> Result<()> {
    write(output, &wrap_simple_events(&read(input)?))
}

pub fn meta_events(input: &Path, output: &Path) -> Result<()> {
    write(output, &wrap_meta_events(&read(input)?))
}

pub fn activation(facts: &Path, output: &Path) -> Result<()> {
    let text = step_activation(&read(facts)?, &facts.display().to_string())?;
    write(output, &text)
}
