//! Per-job tracking state.
//!
//! A [`JobSession`] is owned by exactly one [`Tracker`](crate::tracker::Tracker).
//! It is never reset in place: a new job gets a new session with a new
//! [`SessionId`].

use crate::snapshot::{LifecyclePhase, Snapshot};
use chrono::{DateTime, Utc};
use printwatch_core_types::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Why the current session had to be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// The snapshot names a different job.
    JobChanged,
    /// An active phase began after the session ended.
    Restarted,
}

impl Replacement {
    pub fn as_str(self) -> &'static str {
        match self {
            Replacement::JobChanged => "job_changed",
            Replacement::Restarted => "restarted",
        }
    }
}

/// Accumulated state of one logical print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSession {
    session_id: SessionId,
    job_identifier: Option<String>,
    started_at: Option<DateTime<Utc>>,
    phase: LifecyclePhase,
    fired_percentages: BTreeSet<u8>,
    fired_first_layer: bool,
    fired_second_layer: bool,
    fired_start: bool,
    fired_finish: bool,
    fired_failure: bool,
    ended: bool,
    last_snapshot: Option<Snapshot>,
}

impl Default for JobSession {
    fn default() -> Self {
        Self::idle()
    }
}

impl JobSession {
    /// The session a tracker starts with before any snapshot arrives.
    pub fn idle() -> Self {
        Self {
            session_id: SessionId::new(),
            job_identifier: None,
            started_at: None,
            phase: LifecyclePhase::Idle,
            fired_percentages: BTreeSet::new(),
            fired_first_layer: false,
            fired_second_layer: false,
            fired_start: false,
            fired_finish: false,
            fired_failure: false,
            ended: false,
            last_snapshot: None,
        }
    }

    /// A fresh session for a job first seen at `started_at`.
    pub fn begin(job_identifier: Option<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            job_identifier,
            started_at: Some(started_at),
            ..Self::idle()
        }
    }

    /// Whether `snapshot` belongs to a different session than this one.
    pub fn replacement_for(&self, snapshot: &Snapshot) -> Option<Replacement> {
        if let Some(job) = snapshot.job_identifier() {
            if self.job_identifier.as_deref() != Some(job) {
                return Some(Replacement::JobChanged);
            }
        }
        let reactivated = snapshot
            .lifecycle_phase()
            .is_some_and(LifecyclePhase::is_active);
        if self.ended && reactivated {
            return Some(Replacement::Restarted);
        }
        None
    }

    /// Whether `snapshot` is older than the last one this session accepted.
    pub fn is_stale(&self, snapshot: &Snapshot) -> bool {
        self.last_snapshot
            .as_ref()
            .is_some_and(|last| snapshot.received_at() < last.received_at())
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn job_identifier(&self) -> Option<&str> {
        self.job_identifier.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn fired_percentages(&self) -> &BTreeSet<u8> {
        &self.fired_percentages
    }

    pub fn fired_first_layer(&self) -> bool {
        self.fired_first_layer
    }

    pub fn fired_second_layer(&self) -> bool {
        self.fired_second_layer
    }

    pub fn fired_start(&self) -> bool {
        self.fired_start
    }

    pub fn fired_finish(&self) -> bool {
        self.fired_finish
    }

    pub fn fired_failure(&self) -> bool {
        self.fired_failure
    }

    /// Finished, failed, or dropped back to idle. No further milestones.
    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    pub(crate) fn set_phase(&mut self, phase: LifecyclePhase) {
        self.phase = phase;
    }

    /// Record a percentage milestone. Returns `false` if it already fired.
    pub(crate) fn mark_percentage(&mut self, threshold: u8) -> bool {
        self.fired_percentages.insert(threshold)
    }

    pub(crate) fn mark_first_layer(&mut self) {
        self.fired_first_layer = true;
    }

    pub(crate) fn mark_second_layer(&mut self) {
        self.fired_second_layer = true;
    }

    pub(crate) fn mark_start(&mut self) {
        self.fired_start = true;
    }

    pub(crate) fn mark_finish(&mut self) {
        self.fired_finish = true;
    }

    pub(crate) fn mark_failure(&mut self) {
        self.fired_failure = true;
    }

    pub(crate) fn end(&mut self) {
        self.ended = true;
    }

    pub(crate) fn record(&mut self, snapshot: Snapshot) {
        if self.started_at.is_none() {
            self.started_at = Some(snapshot.received_at());
        }
        self.last_snapshot = Some(snapshot);
    }
}
