#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::snapshot_at;
use printwatch_core::errors::PrintwatchError;
use printwatch_core::logging_facility::test_capture::init_test_capture;
use printwatch_core::{log_op_end, log_op_error, log_op_start, ResolvedConfig, Tracker};
use printwatch_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use serde_json::json;

#[test]
fn test_log_op_start_and_end_pair() {
    let capture = init_test_capture();
    let op_name = "test_log_op_pair_unique_1";

    log_op_start!(op_name, entry_count = 3);
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = PrintwatchError::MalformedRecord {
        line: 4,
        reason: "trailing comma".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 1);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(
        event.fields.get("err.code"),
        Some(&"ERR_INVALID_RECORD".to_string())
    );
}

#[test]
fn test_tracker_logs_new_session_with_its_id() {
    let capture = init_test_capture();
    let mut tracker = Tracker::new(&ResolvedConfig::default());

    tracker.process(snapshot_at(
        1,
        json!({"job_id": "logging-job", "gcode_state": "PREPARE"}),
    ));

    let session_id = tracker.session().session_id().to_string();
    let events = capture.events_for_session(&session_id);
    assert!(
        events
            .iter()
            .any(|e| e.fields.get("reason") == Some(&"job_changed".to_string())),
        "Session start should be logged under the new session id"
    );
    assert!(events
        .iter()
        .any(|e| e.fields.get("event_kind") == Some(&"process_start".to_string())));
}
