use chrono::DateTime;
use printwatch_core::event::{Event, EventContext, EventKind};
use printwatch_core::snapshot::{Fields, Snapshot};
use serde_json::Value;

/// Build a snapshot received `secs` seconds after the epoch.
#[allow(dead_code)]
pub fn snapshot_at(secs: i64, report: Value) -> Snapshot {
    let at = DateTime::from_timestamp(secs, 0).unwrap();
    Snapshot::from_report(&report, at).unwrap()
}

/// Build a sequence of snapshots one second apart, starting at 1.
#[allow(dead_code)]
pub fn snapshots(reports: Vec<Value>) -> Vec<Snapshot> {
    reports
        .into_iter()
        .enumerate()
        .map(|(i, report)| snapshot_at(i as i64 + 1, report))
        .collect()
}

/// Convert JSON objects into raw log entries.
#[allow(dead_code)]
pub fn log_entries(values: Vec<Value>) -> Vec<Fields> {
    values
        .into_iter()
        .map(|v| v.as_object().unwrap().clone().into_iter().collect())
        .collect()
}

#[allow(dead_code)]
pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

/// Percentage thresholds carried by `progress_percent` events, in order.
#[allow(dead_code)]
pub fn percentages(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e.context {
            EventContext::Percentage(p) => Some(p),
            _ => None,
        })
        .collect()
}
