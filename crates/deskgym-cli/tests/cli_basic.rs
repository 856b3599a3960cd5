//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_deskgym"))
        .args(args)
        .env("DESKGYM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn event_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line is JSON"))
        .collect()
}

#[test]
fn test_config_list_has_defaults() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["prompt"]["cooldown_seconds"], 60.0);
    assert_eq!(config["prompt"]["streak_threshold"], 3);
    assert_eq!(config["exercise"]["duration_seconds"], 45.0);
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "prompt.streak_threshold", "5"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "prompt.streak_threshold"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "prompt.streak_threshold"]);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "prompt.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "prompt.streak_threshold", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_roster_list_uses_built_in_exercises() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["roster", "list"]);
    assert_eq!(code, 0);
    let roster: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(roster.len(), 14);
    assert!(roster.iter().all(|e| e["name"].is_string()));
}

#[test]
fn test_replay_runs_an_exercise_and_logs_it() {
    let dir = TempDir::new().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, "{\"type\":\"plan_start\"}\n\n{\"type\":\"reading\"}\n").unwrap();

    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &[
            "replay",
            events.to_str().unwrap(),
            "--seed",
            "7",
            "--auto-accept",
            "--max-seconds",
            "70",
        ],
    );
    assert_eq!(code, 0, "replay failed: {stderr}");

    let lines = event_lines(&stdout);
    let types: Vec<&str> = lines.iter().filter_map(|l| l["type"].as_str()).collect();
    assert!(types.contains(&"PromptRaised"));
    assert!(types.contains(&"ExerciseSelected"));
    assert!(types.contains(&"ExerciseRecorded"));
    assert!(lines.iter().all(|l| l["at_secs"].is_number()));

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "types"]);
    assert_eq!(code, 0);
    let stats: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["count"], 1);

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "trend"]);
    assert_eq!(code, 0);
    let trend: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(trend.len(), 1);
}

#[test]
fn test_replay_plays_out_the_last_event() {
    let dir = TempDir::new().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, "{\"type\":\"plan_start\"}\n").unwrap();

    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &["replay", events.to_str().unwrap(), "--seed", "3", "--auto-accept"],
    );
    assert_eq!(code, 0, "replay failed: {stderr}");

    let lines = event_lines(&stdout);
    let types: Vec<&str> = lines.iter().filter_map(|l| l["type"].as_str()).collect();
    assert!(types.contains(&"PromptRaised"));
    assert!(types.contains(&"ExerciseRecorded"));
}

#[test]
fn test_replay_stops_once_prompt_is_waiting() {
    let dir = TempDir::new().unwrap();
    let events = dir.path().join("events.jsonl");
    std::fs::write(&events, "{\"type\":\"plan_start\"}\n").unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["replay", events.to_str().unwrap()]);
    assert_eq!(code, 0);
    let lines = event_lines(&stdout);
    assert_eq!(lines.last().and_then(|l| l["type"].as_str()), Some("PromptRaised"));
}

#[test]
fn test_replay_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.jsonl");
    let (code, _, stderr) = run_cli(dir.path(), &["replay", missing.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn test_log_clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["log", "clear"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--yes"));

    let (code, _, _) = run_cli(dir.path(), &["log", "clear", "--yes"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["log", "list"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_stats_today_is_empty_on_a_fresh_log() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["stats", "today"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "[]");
}
