//! Human-readable rendering of diffs and watch windows.

use crate::analyzer::WatchWindow;
use crate::diff::model::DiffEntry;
use crate::snapshot::{stage_description, Fields};
use serde_json::Value;

/// Fields whose numeric values are stage codes.
const STAGE_KEYS: &[&str] = &["stg_cur", "mc_print_sub_stage"];

const NOT_PRESENT: &str = "<not present>";

/// Format one value for display, translating stage codes.
pub fn format_value(key: &str, value: &Value) -> String {
    let plain = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if !STAGE_KEYS.contains(&key) {
        return plain;
    }
    let description = value
        .as_i64()
        .and_then(stage_description)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown Code ({})", plain));
    format!("{} ({})", plain, description)
}

fn format_side(key: &str, value: Option<&Value>) -> String {
    value
        .map(|v| format_value(key, v))
        .unwrap_or_else(|| NOT_PRESENT.to_string())
}

/// Render every field of a baseline entry, sorted, skipping `ignored`.
pub fn render_baseline(fields: &Fields, ignored: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    for (key, value) in fields {
        if ignored(key) {
            continue;
        }
        out.push_str(&format!("  - {}: {}\n", key, format_value(key, value)));
    }
    out
}

/// Render the changes of a diff entry, one line per field.
pub fn render_changes(entry: &DiffEntry) -> String {
    let mut out = String::new();
    for (key, change) in entry.iter() {
        out.push_str(&format!(
            "  - {}: {} -> {}\n",
            key,
            format_side(key, change.old.as_ref()),
            format_side(key, change.new.as_ref())
        ));
    }
    out
}

/// Render a watch window: trigger header followed by each context entry.
///
/// Entry numbers are printed 1-based to match line numbers in the log.
pub fn render_watch_window(
    window: &WatchWindow,
    entries: &[Fields],
    ignored: &dyn Fn(&str) -> bool,
) -> String {
    let mut out = String::new();

    let header: Vec<String> = window
        .triggers
        .iter()
        .map(|(key, change)| {
            format!(
                "'{}' ({} -> {})",
                key,
                format_side(key, change.old.as_ref()),
                format_side(key, change.new.as_ref())
            )
        })
        .collect();
    let header = format!(
        "--- Trigger on {} at Entry {} ---",
        header.join(", "),
        window.trigger_index + 1
    );
    out.push_str(&header);
    out.push('\n');

    for item in &window.entries {
        let marker = if item.is_trigger { " (TRG)" } else { "" };
        out.push_str(&format!("\n[Context Entry {}{}]\n", item.index + 1, marker));
        match &item.changes {
            None => {
                if let Some(fields) = entries.get(item.index) {
                    out.push_str(&render_baseline(fields, ignored));
                }
            }
            Some(changes) if changes.is_empty() => {
                out.push_str("  (No change from previous entry)\n");
            }
            Some(changes) => out.push_str(&render_changes(changes)),
        }
    }

    out.push_str(&"-".repeat(header.len()));
    out.push('\n');
    out
}
