//! Integration tests for the casper CLI.
//!
//! Run with: `cargo test --package casper-cli --test cli_integration`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run casper in `dir` with an isolated home and no inherited CASPER_* settings.
fn run_casper(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_casper"));
    command
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("CASPER_CLINGO")
        .env_remove("CASPER_THREADS")
        .env_remove("CASPER_SOLVE_TIMEOUT")
        .env_remove("CASPER_TIME_UNIT")
        .args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute casper command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const OBSERVATIONS: &str = "person(p1).\nobs(p1, temp, 39, 7).\nobs(p1, temp, 38, 3).\n";

// =============================================================================
// Basic CLI Tests
// =============================================================================

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(temp.path(), &["--help"], &[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("incremental"));
    assert!(text.contains("meta-events"));
    assert!(text.contains("prep"));
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(temp.path(), &["--version"], &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("casper"));
}

// =============================================================================
// Prep Commands
// =============================================================================

#[test]
fn test_prep_observations_to_stdout() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("obs.lp"), OBSERVATIONS).unwrap();

    let output = run_casper(temp.path(), &["prep", "observations", "obs.lp", "-"], &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let t3 = text.find("#program step(t3).").unwrap();
    let t7 = text.find("#program step(t7).").unwrap();
    assert!(t3 < t7);
    assert!(text.starts_with("person(p1).\n"));
}

#[test]
fn test_prep_filter_accepts_negative_bounds() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("obs.lp"), "obs(a, -2).\nobs(b, 4).\n").unwrap();

    let output = run_casper(
        temp.path(),
        &["prep", "filter", "obs.lp", "out.lp", "-5", "0"],
        &[],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(temp.path().join("out.lp")).unwrap(),
        "obs(a, -2).\n"
    );
}

#[test]
fn test_prep_activation_writes_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("obs.lp"), OBSERVATIONS).unwrap();

    let grouped = run_casper(
        temp.path(),
        &["prep", "observations", "obs.lp", "facts.lp"],
        &[],
    );
    assert!(grouped.status.success());

    let output = run_casper(
        temp.path(),
        &["prep", "activation", "facts.lp", "activation.lp"],
        &[],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let activation = fs::read_to_string(temp.path().join("activation.lp")).unwrap();
    assert!(activation.starts_with("#program base.\n"));
    assert!(activation.contains("use_linear(t3)."));
    assert!(activation.contains("use_repair(t7)."));
}

#[test]
fn test_prep_activation_without_steps_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("facts.lp"), "person(p1).\n").unwrap();

    let output = run_casper(temp.path(), &["prep", "activation", "facts.lp", "-"], &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No #program step"));
}

#[test]
fn test_prep_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(temp.path(), &["prep", "atemporal", "missing.lp", "-"], &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.lp"));
}

// =============================================================================
// Incremental Command
// =============================================================================

#[test]
fn test_incremental_without_steps_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("facts.lp"), "#program base.\nperson(p1).\n").unwrap();
    fs::write(temp.path().join("rules.lp"), "").unwrap();

    let output = run_casper(
        temp.path(),
        &[
            "incremental",
            "--facts",
            "facts.lp",
            "--base",
            "facts.lp",
            "--step",
            "rules.lp",
        ],
        &[],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No #program step"));
}

#[cfg(not(feature = "clingo"))]
#[test]
fn test_incremental_reports_missing_backend() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("facts.lp"), "#program step(1).\nobs(a, 1).\n").unwrap();

    let output = run_casper(
        temp.path(),
        &[
            "incremental",
            "--facts",
            "facts.lp",
            "--base",
            "facts.lp",
            "--step",
            "facts.lp",
        ],
        &[],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--features clingo"));
}

#[test]
fn test_incremental_requires_base_and_step() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(temp.path(), &["incremental", "--facts", "facts.lp"], &[]);
    assert!(!output.status.success());
}

// =============================================================================
// Meta-Events Command
// =============================================================================

#[cfg(unix)]
mod meta_events {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::OnceLock;

    /// Turns every fact `x.` of the last argument into `meta_x`.
    const FAKE_CLINGO: &str = r#"#!/bin/sh
for arg; do facts="$arg"; done
atoms=$(sed -e 's/\.$//' -e 's/.*/"meta_&"/' "$facts" | paste -sd, -)
printf '{"Solver":"fake","Call":[{"Witnesses":[{"Value":[%s]}]}],"Result":"SATISFIABLE","Time":{"Total":0.25,"CPU":0.125}}\n' "$atoms"
exit 10
"#;

    fn fake_clingo() -> &'static Path {
        static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
        let (_, path) = SCRIPT.get_or_init(|| {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("clingo");
            fs::write(&path, FAKE_CLINGO).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            (dir, path)
        });
        path
    }

    const REPORT: &str = r#"{
  "Solver": "clingo version 5.7.1",
  "Input": ["base.lp", "/tmp/parameters3.lp"],
  "Call": [{"Start": 0.0, "Stop": 3.0, "Witnesses": [
    {"Value": ["b", "a"], "Costs": [], "Time": 1.0},
    {"Value": ["c"], "Costs": [], "Time": 0.0}
  ]}],
  "Result": "SAT",
  "Models": {"Number": 2, "More": "no"},
  "Calls": 1,
  "Time": {"Total": 3.0, "Solve": 2.0, "Model": 0.0, "Unsat": 0.0, "CPU": 2.5},
  "Stats": {}
}"#;

    fn setup(dir: &Path) {
        fs::write(dir.join("report.json"), REPORT).unwrap();
        fs::write(dir.join("base.lp"), "").unwrap();
        fs::write(dir.join("meta.lp"), "").unwrap();
    }

    #[test]
    fn test_meta_events_prints_rewritten_report() {
        let temp = TempDir::new().unwrap();
        setup(temp.path());
        let clingo = fake_clingo().display().to_string();

        let output = run_casper(
            temp.path(),
            &["meta-events", "base.lp", "meta.lp", "report.json", "--threads", "2"],
            &[("CASPER_CLINGO", clingo.as_str())],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let witnesses = report["Call"][0]["Witnesses"].as_array().unwrap();
        assert_eq!(witnesses[0]["Value"], serde_json::json!(["meta_a", "meta_b"]));
        assert_eq!(witnesses[0]["Time"], 1.25);
        assert_eq!(witnesses[1]["Value"], serde_json::json!(["meta_c"]));
        assert_eq!(report["Time"]["Total"], 0.5);
        assert_eq!(report["Time"]["CPU"], 0.25);
        assert_eq!(report["Input"], serde_json::json!(["base.lp", "meta.lp"]));
    }

    #[test]
    fn test_meta_events_output_file() {
        let temp = TempDir::new().unwrap();
        setup(temp.path());
        let clingo = fake_clingo().display().to_string();

        let output = run_casper(
            temp.path(),
            &["meta-events", "base.lp", "meta.lp", "report.json", "-o", "out.json"],
            &[("CASPER_CLINGO", clingo.as_str())],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).is_empty());

        let written = fs::read_to_string(temp.path().join("out.json")).unwrap();
        let report: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(report["Models"]["Number"], 2);
    }

    #[test]
    fn test_meta_events_malformed_report_fails() {
        let temp = TempDir::new().unwrap();
        setup(temp.path());
        fs::write(temp.path().join("report.json"), "not json").unwrap();

        let output = run_casper(
            temp.path(),
            &["meta-events", "base.lp", "meta.lp", "report.json"],
            &[],
        );
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Malformed report"));
    }
}

// =============================================================================
// Config Command
// =============================================================================

#[test]
fn test_config_env_override() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(
        temp.path(),
        &["config", "get", "threads"],
        &[("CASPER_THREADS", "3")],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "3");
}

#[test]
fn test_config_set_then_get() {
    let temp = TempDir::new().unwrap();
    let set = run_casper(temp.path(), &["config", "set", "time_unit", "minutes"], &[]);
    assert!(set.status.success(), "stderr: {}", stderr(&set));

    let get = run_casper(temp.path(), &["config", "get", "time_unit"], &[]);
    assert_eq!(stdout(&get).trim(), "minutes");
}

#[test]
fn test_config_unknown_key() {
    let temp = TempDir::new().unwrap();
    let output = run_casper(temp.path(), &["config", "get", "nope"], &[]);
    assert!(!output.status.success());
}
