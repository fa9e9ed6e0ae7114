//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_surprise-cli"))
        .env("SURPRISE_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
    stdout
}

#[test]
fn test_config_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["config", "get", "recipient"]);
    assert_eq!(out.trim(), "YeYe");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_countdown_status_past_target() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["config", "set", "countdown.target", "2000-01-01T00:00:00Z"],
    );
    let out = run_cli_success(dir.path(), &["countdown", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["type"], "CountdownSnapshot");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["completed"], true);
    assert_eq!(json["remaining"]["days"], 0);
}

#[test]
fn test_countdown_status_future_target() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["config", "set", "countdown.target", "2999-01-01T00:00:00Z"],
    );
    let out = run_cli_success(dir.path(), &["countdown", "status"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "counting");
    assert_eq!(json["completed"], false);
    assert!(json["remaining"]["days"].as_u64().unwrap() > 0);
}

#[test]
fn test_countdown_watch_past_target_celebrates() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(
        dir.path(),
        &["config", "set", "countdown.target", "2000-01-01T00:00:00Z"],
    );
    let out = run_cli_success(dir.path(), &["countdown", "watch"]);
    assert!(out.contains("CelebrationStarted"));
    assert!(out.contains("Happy Birthday!"));
}

#[test]
fn test_guestbook_sign_and_list() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["guestbook", "sign", "Ana", "Happy birthday!"]);
    run_cli_success(dir.path(), &["guestbook", "sign", "Ben", "Many happy returns"]);

    let out = run_cli_success(dir.path(), &["guestbook", "list", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "Ben");

    let text = run_cli_success(dir.path(), &["guestbook", "list"]);
    assert!(text.contains("Ana: Happy birthday!"));
}

#[test]
fn test_guestbook_rejects_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["guestbook", "sign", "  ", "hi"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must not be empty"));
}

#[test]
fn test_teaser_runs_to_finish() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["teaser", "start"]);
    assert!(out.contains("StageEntered"));

    for _ in 0..3 {
        run_cli_success(dir.path(), &["teaser", "advance"]);
    }
    let status = run_cli_success(dir.path(), &["teaser", "status"]);
    assert!(status.contains("\"finished\""));

    let restarted = run_cli_success(dir.path(), &["teaser", "restart"]);
    assert!(restarted.contains("SequenceRestarted"));
}

#[test]
fn test_teaser_dodge() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["teaser", "dodge"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    let x = json["x"].as_f64().unwrap();
    assert!((-100.0..100.0).contains(&x));
}

#[test]
fn test_teaser_picks_up_new_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["teaser", "start"]);
    assert!(out.contains("It's Your Birthday YeYe!"));

    run_cli_success(dir.path(), &["config", "set", "recipient", "Zed"]);
    let restarted = run_cli_success(dir.path(), &["teaser", "restart"]);
    assert!(restarted.contains("It's Your Birthday Zed!"));
    assert!(!restarted.contains("YeYe"));

    let status = run_cli_success(dir.path(), &["teaser", "status"]);
    assert!(status.contains("It's Your Birthday Zed!"));
}
