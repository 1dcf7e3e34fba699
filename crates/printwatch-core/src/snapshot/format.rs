//! Formatting helpers for message templates.

use super::Fields;
use serde_json::Value;

const MODEL_EXTENSIONS: &[&str] = &["stl", "3mf", "step"];

/// Name of the job being printed.
///
/// Prefers `gcode_file`, falls back to `subtask_name`, and strips a trailing
/// model-file extension. Returns `"Unknown File"` when neither is set.
pub fn print_name(fields: &Fields) -> String {
    let name = ["gcode_file", "subtask_name"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty());

    let Some(name) = name else {
        return "Unknown File".to_string();
    };

    match name.rsplit_once('.') {
        Some((stem, ext)) if MODEL_EXTENSIONS.contains(&ext) => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Render a minute count as "1 day, 2 hours, and 5 minutes".
pub fn format_remaining(minutes: u32) -> String {
    if minutes == 0 {
        return "0 minutes".to_string();
    }

    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;

    let parts: Vec<String> = [(days, "day"), (hours, "hour"), (mins, "minute")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{} {}{}", n, unit, if n > 1 { "s" } else { "" }))
        .collect();

    oxford_join(&parts)
}

fn oxford_join(parts: &[String]) -> String {
    match parts {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
