//! CLI end-to-end tests
//!
//! Tests for the adsync command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the adsync binary
#[allow(deprecated)]
fn adsync_cmd() -> Command {
    Command::cargo_bin("adsync").unwrap()
}

fn trace_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/traces/ad_break.jsonl")
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = adsync_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = adsync_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("adsync"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = adsync_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_replay_help() {
    let mut cmd = adsync_cmd();
    cmd.args(["replay", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replay a JSON-lines player trace"));
}

#[test]
fn test_cli_replay_fixture() {
    let mut cmd = adsync_cmd();
    cmd.arg("replay")
        .arg(trace_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("S id=M1 seq=1:1"))
        .stdout(predicate::str::contains("E id=M1 seq=1:1"))
        .stdout(predicate::str::contains("-- normalizing started"))
        .stdout(predicate::str::contains("Beacon batches: 1"))
        .stdout(predicate::str::contains("Beacons delivered: 4"))
        .stdout(predicate::str::contains("Corrected samples: 4"));
}

#[test]
fn test_cli_replay_raw() {
    let mut cmd = adsync_cmd();
    cmd.args(["replay", "--raw"])
        .arg(trace_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Corrected samples: 0"))
        .stdout(predicate::str::contains("normalizing started").not());
}

#[test]
fn test_cli_replay_json() {
    let mut cmd = adsync_cmd();
    let output = cmd
        .args(["replay", "--json"])
        .arg(trace_fixture())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let beacons = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .filter(|value| value["event"] == "beacon")
        .count();
    assert_eq!(beacons, 4);
    assert!(stdout.contains("\"event\":\"timeline_changed\""));
}

#[test]
fn test_cli_replay_nonexistent_trace() {
    let mut cmd = adsync_cmd();
    cmd.args(["replay", "/nonexistent/trace.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_replay_malformed_trace() {
    let dir = tempdir().unwrap();
    let trace = dir.path().join("bad.jsonl");
    fs::write(&trace, "{\"event\":\"ready\"}\nnot json\n").unwrap();

    let mut cmd = adsync_cmd();
    cmd.arg("replay")
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_cli_replay_lenient_config_skips_bad_lines() {
    let dir = tempdir().unwrap();
    let trace = dir.path().join("bad.jsonl");
    fs::write(&trace, "{\"event\":\"ready\"}\nnot json\n{\"event\":\"time_changed\",\"time\":1.0}\n").unwrap();
    let config = dir.path().join("adsync.toml");
    fs::write(&config, "[replay]\nstrict = false\n").unwrap();

    let mut cmd = adsync_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("replay")
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("Player events: 2"));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[normalizer]
enabled = true
normalize_outside_ads = true
ads_forward_threshold = 1.5

[emitter]
drain_due_beacons = false
"#,
    )
    .unwrap();

    let mut cmd = adsync_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Normalize outside ads: true"))
        .stdout(predicate::str::contains("Drain due beacons: false"));
}

#[test]
fn test_cli_validate_invalid_threshold() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[normalizer]\nbackward_threshold = 0.5\n").unwrap();

    let mut cmd = adsync_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("backward_threshold"));
}

#[test]
fn test_cli_validate_malformed_toml() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[normalizer\nenabled = ").unwrap();

    let mut cmd = adsync_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = adsync_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"));
}
