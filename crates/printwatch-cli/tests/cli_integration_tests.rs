//! CLI integration tests
//!
//! These run the built binary against log files in a temporary directory.

use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_log(temp_dir: &TempDir, lines: &[serde_json::Value]) -> PathBuf {
    let path = temp_dir.path().join("status.jsonl");
    let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    fs::write(&path, body.join("\n") + "\n").unwrap();
    path
}

fn stage_log(temp_dir: &TempDir) -> PathBuf {
    let lines: Vec<_> = (0..10)
        .map(|i| {
            let stage = if i < 5 { 1 } else { 2 };
            json!({"sequence_id": i.to_string(), "stg_cur": stage, "gcode_state": "PREPARE", "job_id": "9"})
        })
        .collect();
    write_log(temp_dir, &lines)
}

fn run(args: &[&str], cwd: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_printwatch"))
        .current_dir(cwd.path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_analyze_watch_mode() {
    // Scenario: watch stg_cur with default context over ten entries
    // Then: one window spanning entries 4..8 (1-based), exit 0
    let temp_dir = TempDir::new().unwrap();
    let log = stage_log(&temp_dir);

    let output = run(
        &["analyze", log.to_str().unwrap(), "--watch", "stg_cur"],
        &temp_dir,
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("--- Trigger on 'stg_cur'").count(), 1);
    assert!(stdout.contains("at Entry 6 ---"));
    assert!(stdout.contains("[Context Entry 4]"));
    assert!(stdout.contains("[Context Entry 8]"));
    assert!(!stdout.contains("[Context Entry 3]"));
    assert!(!stdout.contains("[Context Entry 9]"));
}

#[test]
fn test_cli_analyze_diff_mode() {
    let temp_dir = TempDir::new().unwrap();
    let log = stage_log(&temp_dir);

    let output = run(&["analyze", log.to_str().unwrap()], &temp_dir);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Entry 1 (Baseline) ---"));
    assert!(stdout.contains("--- Changes in Entry 6 ---"));
    assert_eq!(stdout.matches("--- Changes in Entry").count(), 1);
}

#[test]
fn test_cli_analyze_bad_tolerance_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let log = stage_log(&temp_dir);

    let output = run(
        &["analyze", log.to_str().unwrap(), "--tolerance", "bed_temper"],
        &temp_dir,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: [ERR_INVALID_TOLERANCE]"));
}

#[test]
fn test_cli_analyze_malformed_log_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.jsonl");
    fs::write(&path, "{\"a\": 1}\n{\"a\": \n").unwrap();

    let output = run(&["analyze", path.to_str().unwrap()], &temp_dir);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_RECORD"));
    assert!(stderr.contains("(line: 2)"));
}

#[test]
fn test_cli_analyze_missing_file_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["analyze", "does-not-exist.jsonl"], &temp_dir);
    assert!(!output.status.success());
}

#[test]
fn test_cli_replay_prints_events_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let log = write_log(
        &temp_dir,
        &[
            json!({"gcode_state": "IDLE"}),
            json!({"gcode_state": "PREPARE", "job_id": "5", "gcode_file": "benchy.3mf"}),
            json!({"gcode_state": "RUNNING", "job_id": "5", "layer_num": 1, "mc_percent": 3}),
            json!({"gcode_state": "FINISH", "job_id": "5", "mc_percent": 100}),
        ],
    );

    let output = run(&["replay", log.to_str().unwrap(), "--json"], &temp_dir);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let kinds: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["kind"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, vec!["process_start", "first_layer_done", "process_end"]);
}

#[test]
fn test_cli_replay_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let log = write_log(
        &temp_dir,
        &[
            json!({"gcode_state": "RUNNING", "job_id": "5", "layer_num": 1, "total_layer_num": 4, "gcode_file": "benchy.3mf"}),
            json!({"gcode_state": "RUNNING", "job_id": "5", "layer_num": 2, "total_layer_num": 4}),
        ],
    );
    let config = temp_dir.path().join("printwatch.toml");
    fs::write(
        &config,
        "[notify]\npercentage_mode = \"layer\"\nreport_percentages = [25, 50]\nreport_start_event = \"off\"\nreport_first_layer = false\nreport_second_layer = false\n",
    )
    .unwrap();

    let output = run(
        &["replay", log.to_str().unwrap(), "--config", config.to_str().unwrap()],
        &temp_dir,
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("progress_percent 25% [benchy]"));
    assert!(stdout.contains("progress_percent 50%"));
    assert!(stdout.contains("Replayed 2 snapshots, 2 events"));
}
