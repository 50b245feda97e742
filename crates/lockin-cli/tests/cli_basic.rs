//! Basic CLI E2E tests.
//!
//! Tests run the built `lockin` binary against a throwaway data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

fn lockin(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lockin"));
    cmd.env("LOCKIN_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = lockin(data_dir)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");
    split(output)
}

/// Run `lockin run` feeding `input` on stdin after `delay`.
fn run_session(data_dir: &Path, args: &[&str], delay: Duration, input: &str) -> (String, String, i32) {
    let mut child = lockin(data_dir)
        .arg("run")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn lockin run");
    thread::sleep(delay);
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(input.as_bytes()).unwrap();
    }
    split(child.wait_with_output().unwrap())
}

fn split(output: Output) -> (String, String, i32) {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn history_json(data_dir: &Path) -> Vec<serde_json::Value> {
    let (stdout, _, code) = run_cli(data_dir, &["history", "list", "--json"]);
    assert_eq!(code, 0);
    serde_json::from_str(&stdout).expect("history is JSON")
}

#[test]
fn test_config_get_default() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.default_duration_min"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "45");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timer.extend_step_min", "10"]);
    assert_eq!(code, 0, "Config set failed");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "timer.extend_step_min"]);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "timer.bogus", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_list_and_reset() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["config", "set", "sound.enabled", "true"]);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["sound"]["enabled"], true);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "sound.enabled"]);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_stats_today_empty() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats", "today"]);
    assert_eq!(code, 0, "Stats today failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["count"], 0);
    assert_eq!(json["totalSeconds"], 0);
}

#[test]
fn test_history_list_empty() {
    let dir = TempDir::new().unwrap();
    assert!(history_json(dir.path()).is_empty());
    let (stdout, _, code) = run_cli(dir.path(), &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No sessions yet."));
}

#[test]
fn test_short_run_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_session(dir.path(), &["--minutes", "25"], Duration::ZERO, "s\n");
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("Not saved"));
    assert!(history_json(dir.path()).is_empty());
}

#[test]
fn test_run_reports_ambient_sound_setting() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_session(dir.path(), &[], Duration::ZERO, "s\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("ambient sound: off"));

    run_cli(dir.path(), &["config", "set", "sound.enabled", "true"]);
    let (_, stderr, code) = run_session(dir.path(), &[], Duration::ZERO, "a\ns\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("ambient sound: on (volume 0.50)"));
    assert!(stderr.contains("ambient sound: off"));
}

#[test]
fn test_run_saves_qualifying_session() {
    let dir = TempDir::new().unwrap();
    // Millisecond ticks so a minute of timer time passes quickly.
    run_cli(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);

    let (stdout, _, code) = run_session(
        dir.path(),
        &["--minutes", "0", "--label", "Deep work", "--json"],
        Duration::from_secs(3),
        "s\n",
    );
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("\"type\":\"SessionSaved\""));

    let sessions = history_json(dir.path());
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["label"], "Deep work");
    assert_eq!(sessions[0]["duration"], 0);
    assert!(sessions[0]["overtime"].as_u64().unwrap() > 60);

    let (stdout, _, _) = run_cli(dir.path(), &["stats", "today"]);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["count"], 1);

    let (_, _, code) = run_cli(dir.path(), &["history", "clear"]);
    assert_eq!(code, 0);
    assert!(history_json(dir.path()).is_empty());
}

#[test]
fn test_sound_render_writes_pcm() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("noise.pcm");
    let (_, _, code) = run_cli(
        dir.path(),
        &["sound", "render", "--seconds", "1", "--output", out.to_str().unwrap()],
    );
    assert_eq!(code, 0, "sound render failed");
    assert_eq!(std::fs::metadata(&out).unwrap().len(), 44_100 * 4);
}
