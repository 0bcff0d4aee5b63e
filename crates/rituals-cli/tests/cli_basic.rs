//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run with HOME pointed at a scratch
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "rituals-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("RITUALS_ENV")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help_lists_rituals() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["--help"], "");
    assert_eq!(code, 0);
    for name in ["stillness", "one", "untangle", "last", "config"] {
        assert!(stdout.contains(name), "missing {name} in help");
    }
}

#[test]
fn test_config_path_is_under_home() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "path"], "");
    assert_eq!(code, 0);
    let expected = home.path().join(".config").join("rituals").join("config.toml");
    assert_eq!(stdout.trim(), expected.display().to_string());
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "one.work_minutes"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "one.break_minutes", "7"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "one.break_minutes"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "7");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "nope"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Configuration error: unknown config key: nope"));
}

#[test]
fn test_config_list_is_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"], "");
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stillness"]["arrival_secs"], 30);
}

#[test]
fn test_last_with_no_log_prints_nothing() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["last", "untangle"], "");
    assert_eq!(code, 0);
    assert!(stdout.trim().is_empty());
}

#[test]
fn test_untangle_entry_is_logged() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["untangle"], "  call   the bank \n");
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(home.path(), &["last", "untangle"], "");
    assert_eq!(code, 0);
    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["event"], "entry");
    assert_eq!(record["sentence"], "call the bank.");
    assert!(record["ts"].is_string());
}

#[test]
fn test_untangle_exit_logs_nothing() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["untangle"], "/q\n");
    assert_eq!(code, 0);
    let log = home
        .path()
        .join(".config")
        .join("rituals")
        .join("untangle_log.jsonl");
    assert!(!log.exists());
}

#[test]
fn test_menu_quits_on_q() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &[], "q\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("1. STILLNESS"));
}

#[test]
fn test_config_set_rejects_wrong_type() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "one.work_minutes", "soon"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Configuration error: Invalid configuration value for 'one.work_minutes'"));

    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "one.work_minutes"], "");
    assert_eq!(stdout.trim(), "25");
}
