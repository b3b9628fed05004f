//! Configuration for the operations layer.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};

/// Configuration for CASPER operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Solver executable used for one-shot subprocess runs.
    #[serde(default = "default_clingo_bin")]
    pub clingo_bin: PathBuf,

    /// Worker pool size for meta-event recomputation.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Per-subprocess timeout in seconds (none = wait indefinitely).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve_timeout_secs: Option<u64>,

    /// Time unit passed to meta-event rules as the `unit` constant.
    #[serde(default = "default_time_unit")]
    pub time_unit: String,

    /// Input entries containing this marker are dropped by the meta-event pass.
    #[serde(default = "default_stale_input_marker")]
    pub stale_input_marker: String,

    /// Arguments for the incremental solving session.
    #[serde(default = "default_clingo_args")]
    pub clingo_args: Vec<String>,
}

fn default_clingo_bin() -> PathBuf {
    PathBuf::from("clingo")
}

fn default_threads() -> usize {
    1
}

fn default_time_unit() -> String {
    "seconds".to_string()
}

fn default_stale_input_marker() -> String {
    "parameters3.lp".to_string()
}

fn default_clingo_args() -> Vec<String> {
    vec!["--models=0".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clingo_bin: default_clingo_bin(),
            threads: default_threads(),
            solve_timeout_secs: None,
            time_unit: default_time_unit(),
            stale_input_marker: default_stale_input_marker(),
            clingo_args: default_clingo_args(),
        }
    }
}

impl Config {
    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        let config = if let Some(path) = Self::config_file_path() {
            if path.exists() {
                let contents = std::fs::read_to_string(&path)?;
                serde_json::from_str(&contents)?
            } else {
                Self::default()
            }
        } else {
            Self::default()
        };

        config.with_env_overrides()
    }

    /// Apply `CASPER_*` environment variables on top of this configuration.
    pub fn with_env_overrides(self) -> OpsResult<Self> {
        let mut config = self;
        if let Ok(bin) = std::env::var("CASPER_CLINGO") {
            config.clingo_bin = PathBuf::from(bin);
        }
        if let Ok(threads) = std::env::var("CASPER_THREADS") {
            config.set("threads", &threads)?;
        }
        if let Ok(timeout) = std::env::var("CASPER_SOLVE_TIMEOUT") {
            config.set("solve_timeout_secs", &timeout)?;
        }
        if let Ok(unit) = std::env::var("CASPER_TIME_UNIT") {
            config.time_unit = unit;
        }
        Ok(config)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "casper", "casper")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Per-subprocess timeout, if configured.
    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_secs.map(Duration::from_secs)
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "clingo_bin" => Some(self.clingo_bin.display().to_string()),
            "threads" => Some(self.threads.to_string()),
            "solve_timeout_secs" => self.solve_timeout_secs.map(|s| s.to_string()),
            "time_unit" => Some(self.time_unit.clone()),
            "stale_input_marker" => Some(self.stale_input_marker.clone()),
            "clingo_args" => Some(self.clingo_args.join(" ")),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "clingo_bin" => {
                self.clingo_bin = PathBuf::from(value);
            }
            "threads" => {
                let threads: usize = value
                    .parse()
                    .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))?;
                if threads == 0 {
                    return Err(OpsError::InvalidThreads(threads));
                }
                self.threads = threads;
            }
            "solve_timeout_secs" => {
                self.solve_timeout_secs = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))?,
                    )
                };
            }
            "time_unit" => {
                self.time_unit = value.to_string();
            }
            "stale_input_marker" => {
                self.stale_input_marker = value.to_string();
            }
            "clingo_args" => {
                self.clingo_args = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                return Err(OpsError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }

    /// Keys accepted by [`Config::get`] and [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &[
            "clingo_bin",
            "threads",
            "solve_timeout_secs",
            "time_unit",
            "stale_input_marker",
            "clingo_args",
        ]
    }
}
