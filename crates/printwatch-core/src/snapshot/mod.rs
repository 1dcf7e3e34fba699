//! Printer status snapshots.
//!
//! A [`Snapshot`] keeps the full raw field map it was built from (for
//! diffing and templating) next to the handful of typed fields the tracker
//! reasons about. Typed fields are derived once, at construction, and are
//! `None` whenever the raw value is missing or unusable.

pub mod format;
pub mod phase;

pub use format::{format_remaining, print_name};
pub use phase::{normalize, stage_description, LifecyclePhase};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw flat field mapping as reported by the printer.
pub type Fields = BTreeMap<String, Value>;

/// Raw keys that may name the active job, in order of preference.
const JOB_KEYS: &[&str] = &["job_id", "subtask_id", "task_id", "gcode_file", "subtask_name"];

/// One reported device-status record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    received_at: DateTime<Utc>,
    job_identifier: Option<String>,
    lifecycle_phase: Option<LifecyclePhase>,
    percent_time_based: Option<u8>,
    current_layer: Option<u32>,
    total_layers: Option<u32>,
    remaining_minutes: Option<u32>,
    fields: Fields,
}

impl Snapshot {
    /// Build a snapshot from a flat field map.
    pub fn from_fields(fields: Fields, received_at: DateTime<Utc>) -> Self {
        let lifecycle_phase = normalize(
            fields.get("gcode_state").and_then(Value::as_str),
            int_field(&fields, "stg_cur"),
        );

        Self {
            received_at,
            job_identifier: job_identifier(&fields),
            lifecycle_phase,
            percent_time_based: uint_field(&fields, "mc_percent").map(|p| p.min(100) as u8),
            current_layer: uint_field(&fields, "layer_num"),
            total_layers: uint_field(&fields, "total_layer_num"),
            remaining_minutes: uint_field(&fields, "mc_remaining_time"),
            fields,
        }
    }

    /// Build a snapshot from a JSON report.
    ///
    /// Accepts either the flat mapping or a raw MQTT report wrapped as
    /// `{"print": {...}}`. Returns `None` when the payload is not an object.
    pub fn from_report(report: &Value, received_at: DateTime<Utc>) -> Option<Self> {
        let body = match report.get("print") {
            Some(inner) if inner.is_object() => inner,
            _ => report,
        };
        let fields: Fields = body
            .as_object()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self::from_fields(fields, received_at))
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn job_identifier(&self) -> Option<&str> {
        self.job_identifier.as_deref()
    }

    pub fn lifecycle_phase(&self) -> Option<LifecyclePhase> {
        self.lifecycle_phase
    }

    pub fn percent_time_based(&self) -> Option<u8> {
        self.percent_time_based
    }

    pub fn current_layer(&self) -> Option<u32> {
        self.current_layer
    }

    /// Total layer count; `Some(0)` means the printer does not know yet.
    pub fn total_layers(&self) -> Option<u32> {
        self.total_layers
    }

    pub fn remaining_minutes(&self) -> Option<u32> {
        self.remaining_minutes
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Raw value of one field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display name of the job for message templates.
    pub fn print_name(&self) -> String {
        print_name(&self.fields)
    }
}

fn job_identifier(fields: &Fields) -> Option<String> {
    JOB_KEYS.iter().find_map(|key| {
        let id = match fields.get(*key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!id.is_empty() && id != "0").then_some(id)
    })
}

/// Read an integer that may have been sent as a number or a numeric string.
fn int_field(fields: &Fields, key: &str) -> Option<i64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn uint_field(fields: &Fields, key: &str) -> Option<u32> {
    int_field(fields, key).and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_typed_fields_are_derived() {
        let report = json!({
            "gcode_state": "RUNNING",
            "stg_cur": 0,
            "mc_percent": 42,
            "layer_num": 12,
            "total_layer_num": 120,
            "mc_remaining_time": 95,
            "subtask_id": "778",
            "bed_temper": 60.1
        });
        let snapshot = Snapshot::from_report(&report, at()).unwrap();

        assert_eq!(snapshot.lifecycle_phase(), Some(LifecyclePhase::Printing));
        assert_eq!(snapshot.percent_time_based(), Some(42));
        assert_eq!(snapshot.current_layer(), Some(12));
        assert_eq!(snapshot.total_layers(), Some(120));
        assert_eq!(snapshot.remaining_minutes(), Some(95));
        assert_eq!(snapshot.job_identifier(), Some("778"));
        assert_eq!(snapshot.field("bed_temper"), Some(&json!(60.1)));
    }

    #[test]
    fn test_wrapped_mqtt_report_is_unwrapped() {
        let report = json!({"print": {"gcode_state": "FINISH", "job_id": 5}});
        let snapshot = Snapshot::from_report(&report, at()).unwrap();
        assert_eq!(snapshot.lifecycle_phase(), Some(LifecyclePhase::Finished));
        assert_eq!(snapshot.job_identifier(), Some("5"));
    }

    #[test]
    fn test_missing_and_bad_values_become_none() {
        let report = json!({"layer_num": -3, "mc_percent": "soon", "job_id": "0"});
        let snapshot = Snapshot::from_report(&report, at()).unwrap();
        assert_eq!(snapshot.lifecycle_phase(), None);
        assert_eq!(snapshot.current_layer(), None);
        assert_eq!(snapshot.percent_time_based(), None);
        assert_eq!(snapshot.job_identifier(), None);
    }

    #[test]
    fn test_non_object_report_is_rejected() {
        assert!(Snapshot::from_report(&json!([1, 2, 3]), at()).is_none());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let report = json!({"gcode_state": "RUNNING", "stg_cur": "2", "mc_percent": "101"});
        let snapshot = Snapshot::from_report(&report, at()).unwrap();
        assert_eq!(
            snapshot.lifecycle_phase(),
            Some(LifecyclePhase::Calibrating)
        );
        assert_eq!(snapshot.percent_time_based(), Some(100));
    }
}
