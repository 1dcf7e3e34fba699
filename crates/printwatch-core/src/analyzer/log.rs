//! Recorded status logs (JSON Lines, one snapshot per line).

use crate::errors::{PrintwatchError, Result};
use crate::snapshot::{Fields, Snapshot};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Keys a recorder may have stamped each line with.
const TIMESTAMP_KEYS: &[&str] = &["received_at", "timestamp"];

/// Parse a JSON Lines stream into raw field maps.
///
/// Blank lines are skipped. Any other line that is not a JSON object fails
/// the whole log with its 1-based line number.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<Fields>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| PrintwatchError::Io {
            op: "read_log".to_string(),
            message: format!("line {}: {}", line_no, e),
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(&line).map_err(|e| PrintwatchError::MalformedRecord {
                line: line_no,
                reason: e.to_string(),
            })?;
        let Value::Object(map) = value else {
            return Err(PrintwatchError::MalformedRecord {
                line: line_no,
                reason: "record is not a JSON object".to_string(),
            });
        };
        entries.push(map.into_iter().collect());
    }

    tracing::debug!(entry_count = entries.len(), "Parsed status log");
    Ok(entries)
}

/// Open and parse a log file.
pub fn load_log(path: &Path) -> Result<Vec<Fields>> {
    let file = File::open(path).map_err(|e| PrintwatchError::LogUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_log(BufReader::new(file))
}

/// When the entry was recorded, if the recorder stamped it.
///
/// Accepts RFC 3339 strings and Unix epoch seconds.
pub fn recorded_at(fields: &Fields) -> Option<DateTime<Utc>> {
    TIMESTAMP_KEYS.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => {
            let secs = n.as_f64()?;
            DateTime::from_timestamp_millis((secs * 1000.0) as i64)
        }
        _ => None,
    })
}

/// Turn recorded entries into snapshots for replay.
///
/// Unstamped entries inherit the previous entry's time. Stamped entries keep
/// their recorded time, so out-of-order records replay as stale.
pub fn to_snapshots(entries: &[Fields]) -> Vec<Snapshot> {
    let mut last = DateTime::UNIX_EPOCH;
    entries
        .iter()
        .filter_map(|fields| {
            let at = recorded_at(fields).unwrap_or(last);
            last = at;
            Snapshot::from_report(&Value::Object(fields.clone().into_iter().collect()), at)
        })
        .collect()
}
