//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_dailystreak"))
        .args(args)
        .env("DAILYSTREAK_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("{args:?} printed non-JSON ({e}): {stdout}"))
}

fn create_task(home: &Path, title: &str) -> String {
    let task = run_json(home, &["task", "create", title, "--recurrence", "daily"]);
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn test_task_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let id = create_task(home.path(), "Stretch");

    let tasks = run_json(home.path(), &["task", "list"]);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["recurrence"], serde_json::json!(["daily"]));

    let updated = run_json(home.path(), &["task", "update", &id, "--notes", "10 minutes"]);
    assert_eq!(updated["notes"], "10 minutes");

    let (code, stdout, _) = run_cli(home.path(), &["task", "delete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task deleted:"));

    let (code, _, stderr) = run_cli(home.path(), &["task", "get", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_task_create_rejects_bad_input() {
    let home = tempfile::tempdir().unwrap();

    let (code, _, stderr) = run_cli(home.path(), &["task", "create", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("title"));

    let (code, _, stderr) = run_cli(
        home.path(),
        &["task", "create", "Read", "--recurrence", "hourly"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("hourly"));
}

#[test]
fn test_checkin_then_stats() {
    let home = tempfile::tempdir().unwrap();
    let id = create_task(home.path(), "Meditate");
    create_task(home.path(), "Journal");

    let first = run_json(home.path(), &["checkin", &id]);
    assert_eq!(first["status"], "recorded");
    assert_eq!(first["count"], 1);
    assert_eq!(first["tier"], "Bronze");
    assert_eq!(first["tier_up"], false);

    let again = run_json(home.path(), &["checkin", &id]);
    assert_eq!(again["status"], "already_checked_in");
    assert_eq!(again["count"], 1);

    let report = run_json(home.path(), &["stats", "--days", "7"]);
    let heatmap = report["heatmap"].as_array().unwrap();
    assert_eq!(heatmap.len(), 7);
    let total: u64 = heatmap.iter().map(|d| d["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 1);
    assert_eq!(report["today_split"]["completed"], 1);
    assert_eq!(report["today_split"]["pending"], 1);
    assert_eq!(report["top_streak_task"]["title"], "Meditate");

    let (code, stdout, _) = run_cli(home.path(), &["stats", "heatmap", "--days", "14"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total completions: 1"));
}

#[test]
fn test_checkin_unknown_task() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["checkin", "no-such-task"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_streaks_and_tiers() {
    let home = tempfile::tempdir().unwrap();
    let id = create_task(home.path(), "Walk");
    run_json(home.path(), &["checkin", &id]);

    let streaks = run_json(home.path(), &["streaks"]);
    assert_eq!(streaks["top_streak_task"]["count"], 1);
    assert_eq!(streaks["level"]["name"], "Bronze");
    let challenges = streaks["challenges"].as_array().unwrap();
    assert_eq!(challenges.len(), 5);
    assert_eq!(challenges[3]["id"], "complete_10_tasks");
    assert_eq!(challenges[3]["progress"], 1);
    assert_eq!(streaks["current"][0]["count"], 1);

    let tiers = run_json(home.path(), &["tiers"]);
    let names: Vec<_> = tiers
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Bronze", "Silver", "Gold", "Diamond"]);
    assert_eq!(tiers[3]["range"], "15+");
}

#[test]
fn test_config_commands() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "analytics.window_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "analytics.window_days", "7"]);
    assert_eq!(code, 0);
    let report = run_json(home.path(), &["stats"]);
    assert_eq!(report["heatmap"].as_array().unwrap().len(), 7);

    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "analytics.bogus", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "analytics.window_days"]);
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_stats_rejects_oversized_window() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["stats", "--days", "100000"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid window of 100000 days"));

    let (code, _, _) = run_cli(home.path(), &["stats", "--days", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_completions_and_verbose() {
    let home = tempfile::tempdir().unwrap();

    let (code, stdout, stderr) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0, "completions failed: {stderr}");
    assert!(stdout.contains("dailystreak"));

    let (code, stdout, stderr) = run_cli(home.path(), &["--verbose", "tiers"]);
    assert_eq!(code, 0, "--verbose tiers failed: {stderr}");
    let tiers: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tiers.as_array().unwrap().len(), 4);

    let (code, _, _) = run_cli(home.path(), &["tiers", "-v"]);
    assert_eq!(code, 0);
}
