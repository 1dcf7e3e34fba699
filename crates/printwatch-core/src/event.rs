//! Notification events produced by the tracker.

use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use printwatch_core_types::SessionId;
use serde::{Deserialize, Serialize};

/// Kinds of semantic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ProcessStart,
    PrintBegin,
    ExtrusionStart,
    FirstLayerDone,
    SecondLayerDone,
    ProgressPercent,
    Pause,
    Resume,
    PrintEnd,
    ProcessEnd,
    PrintFailure,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ProcessStart => "process_start",
            EventKind::PrintBegin => "print_begin",
            EventKind::ExtrusionStart => "extrusion_start",
            EventKind::FirstLayerDone => "first_layer_done",
            EventKind::SecondLayerDone => "second_layer_done",
            EventKind::ProgressPercent => "progress_percent",
            EventKind::Pause => "pause",
            EventKind::Resume => "resume",
            EventKind::PrintEnd => "print_end",
            EventKind::ProcessEnd => "process_end",
            EventKind::PrintFailure => "print_failure",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What made a milestone fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventContext {
    #[default]
    None,
    /// The percentage threshold that was crossed.
    Percentage(u8),
    /// The layer number that was reached.
    Layer(u32),
}

/// A detected event before it is stamped with session data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    pub kind: EventKind,
    pub context: EventContext,
}

impl Emission {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            context: EventContext::None,
        }
    }

    pub fn with_context(kind: EventKind, context: EventContext) -> Self {
        Self { kind, context }
    }
}

/// An immutable notification handed to the dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// `received_at` of the triggering snapshot.
    pub timestamp: DateTime<Utc>,
    pub snapshot: Snapshot,
    pub context: EventContext,
    pub session_id: SessionId,
    pub job_identifier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_wire_name() {
        for kind in [
            EventKind::ProcessStart,
            EventKind::SecondLayerDone,
            EventKind::PrintFailure,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_context_shape() {
        let json = serde_json::to_value(EventContext::Percentage(50)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "percentage", "value": 50}));
        let json = serde_json::to_value(EventContext::None).unwrap();
        assert_eq!(json, serde_json::json!({"type": "none"}));
    }
}
