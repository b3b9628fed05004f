//! Config command implementation.

use anyhow::Result;

use casper_ops::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("CASPER Configuration");
    println!("{:-<40}", "");

    println!("Solver binary:       {}", config.clingo_bin.display());
    println!("Threads:             {}", config.threads);
    println!(
        "Solve timeout:       {}",
        config
            .solve_timeout_secs
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Time unit:           {}", config.time_unit);
    println!("Stale input marker:  {}", config.stale_input_marker);
    println!("Solver arguments:    {}", config.clingo_args.join(" "));

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::keys().join(", ")
        );
    }
    config.set(key, value)?;
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!("Unknown config key: {}", key);
    }
    let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
