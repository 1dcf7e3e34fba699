//! `analyze` and `replay` commands over log files on disk.

use printwatch_core::errors::ExErrorKind;
use printwatch_core::EventKind;
use printwatch_engine::commands::{analyze_log, replay_log, AnalyzeMode, AnalyzeRequest};
use printwatch_engine::Settings;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_log(lines: &[serde_json::Value]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn print_log() -> NamedTempFile {
    write_log(&[
        json!({"sequence_id": "1", "gcode_state": "IDLE", "stg_cur": -1, "bed_temper": 24.0}),
        json!({"sequence_id": "2", "gcode_state": "PREPARE", "stg_cur": 2, "bed_temper": 24.3, "job_id": "77"}),
        json!({"sequence_id": "3", "gcode_state": "RUNNING", "stg_cur": 0, "bed_temper": 60.0, "job_id": "77", "layer_num": 1, "total_layer_num": 4, "mc_percent": 20}),
        json!({"sequence_id": "4", "gcode_state": "RUNNING", "stg_cur": 0, "bed_temper": 60.2, "job_id": "77", "layer_num": 2, "total_layer_num": 4, "mc_percent": 55}),
        json!({"sequence_id": "5", "gcode_state": "FINISH", "stg_cur": 0, "bed_temper": 60.1, "job_id": "77", "layer_num": 4, "total_layer_num": 4, "mc_percent": 100}),
    ])
}

#[test]
fn test_diff_mode_report() {
    let log = print_log();
    let mut request = AnalyzeRequest::new(log.path());
    request.tolerances = vec!["bed_temper:0.5".to_string()];

    let result = analyze_log(&request).unwrap();

    assert_eq!(result.mode, AnalyzeMode::Diff);
    assert_eq!(result.entry_count, 5);
    assert_eq!(result.match_count, 4);
    assert!(result.report.contains("[*] Ignoring keys: sequence_id"));
    assert!(result.report.contains("[*] Applying tolerances: bed_temper:0.5"));
    assert!(result.report.contains("--- Entry 1 (Baseline) ---"));
    assert!(result.report.contains("  - stg_cur: -1 (Idle) -> 2 (Heatbed preheating)"));
    assert!(!result.report.contains("sequence_id: "));
    // 60.0 -> 60.2 is within tolerance
    assert!(!result.report.contains("bed_temper: 60"));
}

#[test]
fn test_watch_mode_report() {
    let log = print_log();
    let mut request = AnalyzeRequest::new(log.path());
    request.watch = vec!["gcode_state".to_string()];
    request.context = 1;

    let result = analyze_log(&request).unwrap();

    assert_eq!(result.mode, AnalyzeMode::Watch);
    assert_eq!(result.match_count, 3);
    assert!(result.report.contains("[*] Context window: 1 entries before and after"));
    assert!(result
        .report
        .contains("--- Trigger on 'gcode_state' (IDLE -> PREPARE) at Entry 2 ---"));
    assert!(result.report.contains("[Context Entry 5 (TRG)]"));
}

#[test]
fn test_watch_without_matches_says_so() {
    let log = print_log();
    let mut request = AnalyzeRequest::new(log.path());
    request.watch = vec!["print_error".to_string()];

    let result = analyze_log(&request).unwrap();

    assert_eq!(result.match_count, 0);
    assert!(result.report.contains("No changes found"));
}

#[test]
fn test_bad_tolerance_is_rejected_before_reading() {
    let mut request = AnalyzeRequest::new("/nonexistent/log.jsonl");
    request.tolerances = vec!["bed_temper".to_string()];

    let err = analyze_log(&request).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidTolerance);
}

#[test]
fn test_malformed_log_fails_with_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{\"a\": 1}}").unwrap();
    writeln!(file, "oops").unwrap();

    let err = analyze_log(&AnalyzeRequest::new(file.path())).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidRecord);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_empty_log() {
    let file = NamedTempFile::new().unwrap();
    let result = analyze_log(&AnalyzeRequest::new(file.path())).unwrap();
    assert_eq!(result.entry_count, 0);
    assert_eq!(result.report, "Log file is empty.\n");
}

#[tokio::test]
async fn test_replay_produces_lifecycle_events() {
    let log = print_log();

    let result = replay_log(log.path(), &Settings::default()).await.unwrap();

    assert_eq!(result.snapshot_count, 5);
    let kinds: Vec<EventKind> = result.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ProcessStart,
            EventKind::FirstLayerDone,
            EventKind::SecondLayerDone,
            EventKind::ProgressPercent,
            EventKind::ProcessEnd
        ]
    );
    assert!(result.session.ended());
    assert_eq!(result.session.job_identifier(), Some("77"));
}

#[tokio::test]
async fn test_replay_ignores_configured_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = dir.path().join("session.json");
    let log = print_log();
    let settings = Settings {
        checkpoint_path: Some(checkpoint.clone()),
        ..Settings::default()
    };

    replay_log(log.path(), &settings).await.unwrap();

    assert!(!checkpoint.exists());
}
