//! CLI tests for the `ta` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run `ta` inside a scratch directory so logs and config lookups stay local
fn ta(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ta").expect("Failed to find ta binary");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env("XDG_CONFIG_HOME", dir.path().join("config"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    ta(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("feedback"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_analyze_invalid_json_fails_before_network() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("tasks.json");
    std::fs::write(&file, "[{\"title\": \"broken\"").unwrap();

    // Nothing listens on this port; the error must come from parsing
    ta(&dir)
        .args(["--url", "http://127.0.0.1:9", "analyze", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in bulk input"));
}

#[test]
fn test_analyze_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    ta(&dir)
        .args(["analyze", "--file", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read nope.json"));
}

#[test]
fn test_invalid_config_reports_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join("bad.yml");
    std::fs::write(&config, "api: [not, a, map]\n").unwrap();

    ta(&dir)
        .args(["-c"])
        .arg(&config)
        .args(["feedback", "urgency", "0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
