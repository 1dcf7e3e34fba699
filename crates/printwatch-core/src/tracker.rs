//! The live status reducer.
//!
//! [`Tracker::process`] is pure with respect to I/O: it folds one snapshot
//! into the current [`JobSession`] and returns the events it produced. One
//! tracker is owned by exactly one processing loop.

use crate::config::ResolvedConfig;
use crate::detector::EventDetector;
use crate::event::{Emission, Event};
use crate::progress::ProgressMilestoneTracker;
use crate::session::JobSession;
use crate::snapshot::{LifecyclePhase, Snapshot};

#[derive(Debug, Clone)]
pub struct Tracker {
    detector: EventDetector,
    progress: ProgressMilestoneTracker,
    suppress_initial: bool,
    primed: bool,
    session: JobSession,
}

impl Tracker {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            detector: EventDetector::new(config),
            progress: ProgressMilestoneTracker::new(config),
            suppress_initial: config.suppress_initial_events,
            primed: false,
            session: JobSession::idle(),
        }
    }

    /// Resume from a previously persisted session.
    ///
    /// A resumed tracker never treats its next snapshot as the initial one.
    pub fn with_session(config: &ResolvedConfig, session: JobSession) -> Self {
        Self {
            primed: true,
            session,
            ..Self::new(config)
        }
    }

    pub fn session(&self) -> &JobSession {
        &self.session
    }

    pub fn into_session(self) -> JobSession {
        self.session
    }

    /// Fold one snapshot into the session and return the events it caused.
    pub fn process(&mut self, snapshot: Snapshot) -> Vec<Event> {
        if self.session.is_stale(&snapshot) {
            tracing::debug!(
                session_id = %self.session.session_id(),
                received_at = %snapshot.received_at(),
                "Ignoring stale snapshot"
            );
            return Vec::new();
        }

        if let Some(reason) = self.session.replacement_for(&snapshot) {
            let job = snapshot
                .job_identifier()
                .or(self.session.job_identifier())
                .map(str::to_string);
            let next = JobSession::begin(job, snapshot.received_at());
            tracing::info!(
                previous_session_id = %self.session.session_id(),
                session_id = %next.session_id(),
                job_id = next.job_identifier().unwrap_or(""),
                reason = reason.as_str(),
                "Starting new job session"
            );
            self.session = next;
        }

        let mut emissions: Vec<Emission> = Vec::new();
        self.detector
            .observe_transition(&mut self.session, &snapshot, &mut emissions);

        if self.session.phase() == LifecyclePhase::Printing && !self.session.ended() {
            self.detector
                .observe_extrusion(&mut self.session, &snapshot, &mut emissions);
            self.progress
                .observe(&mut self.session, &snapshot, &mut emissions);
            self.detector
                .observe_completion(&mut self.session, &snapshot, &mut emissions);
        }

        let initial = !self.primed;
        self.primed = true;
        if initial && self.suppress_initial && !emissions.is_empty() {
            tracing::debug!(
                session_id = %self.session.session_id(),
                suppressed = emissions.len(),
                "Treating first snapshot as baseline"
            );
            emissions.clear();
        }

        let events: Vec<Event> = emissions
            .into_iter()
            .map(|emission| Event {
                kind: emission.kind,
                timestamp: snapshot.received_at(),
                snapshot: snapshot.clone(),
                context: emission.context,
                session_id: self.session.session_id().clone(),
                job_identifier: self.session.job_identifier().map(str::to_string),
            })
            .collect();

        for event in &events {
            tracing::debug!(
                session_id = %event.session_id,
                event_kind = event.kind.as_str(),
                "Detected event"
            );
        }

        self.session.record(snapshot);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::DateTime;
    use serde_json::json;

    fn snap(secs: i64, report: serde_json::Value) -> Snapshot {
        Snapshot::from_report(&report, DateTime::from_timestamp(secs, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let mut tracker = Tracker::new(&ResolvedConfig::default());
        tracker.process(snap(10, json!({"gcode_state": "RUNNING", "job_id": "A"})));
        let events = tracker.process(snap(5, json!({"gcode_state": "PAUSE", "job_id": "A"})));
        assert!(events.is_empty());
        assert_eq!(tracker.session().phase(), LifecyclePhase::Printing);
    }

    #[test]
    fn test_events_carry_session_and_job() {
        let mut tracker = Tracker::new(&ResolvedConfig::default());
        let events = tracker.process(snap(1, json!({"gcode_state": "PREPARE", "job_id": "A"})));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::ProcessStart);
        assert_eq!(events[0].job_identifier.as_deref(), Some("A"));
        assert_eq!(&events[0].session_id, tracker.session().session_id());
        assert_eq!(events[0].timestamp, DateTime::from_timestamp(1, 0).unwrap());
    }

    #[test]
    fn test_initial_snapshot_can_be_suppressed() {
        let config = ResolvedConfig {
            suppress_initial_events: true,
            thresholds: vec![25, 50],
            ..ResolvedConfig::default()
        };
        let mut tracker = Tracker::new(&config);
        let first = tracker.process(snap(
            1,
            json!({"gcode_state": "RUNNING", "job_id": "A", "mc_percent": 30}),
        ));
        assert!(first.is_empty());
        assert!(tracker.session().fired_percentages().contains(&25));

        let next = tracker.process(snap(
            2,
            json!({"gcode_state": "RUNNING", "job_id": "A", "mc_percent": 55}),
        ));
        let kinds: Vec<_> = next.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::ProgressPercent]);
    }
}
