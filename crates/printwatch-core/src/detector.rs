//! Lifecycle event detection.
//!
//! The detector is a state machine over [`LifecyclePhase`]. Its state is the
//! session's `phase`; the detector itself only carries the trigger set
//! resolved from configuration.

use crate::config::{FinishTrigger, ResolvedConfig, StartTrigger};
use crate::event::{Emission, EventContext, EventKind};
use crate::session::JobSession;
use crate::snapshot::{LifecyclePhase, Snapshot};

#[derive(Debug, Clone)]
pub struct EventDetector {
    start: StartTrigger,
    finish: FinishTrigger,
    failure: bool,
}

impl EventDetector {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            start: config.start,
            finish: config.finish,
            failure: config.failure,
        }
    }

    /// Apply the phase carried by `snapshot` and append lifecycle events.
    ///
    /// Snapshots without a recognized phase leave the state untouched.
    pub fn observe_transition(
        &self,
        session: &mut JobSession,
        snapshot: &Snapshot,
        out: &mut Vec<Emission>,
    ) {
        let Some(next) = snapshot.lifecycle_phase() else {
            return;
        };
        let prev = session.phase();
        if next == prev {
            return;
        }
        session.set_phase(next);

        use LifecyclePhase::*;
        match (prev, next) {
            (Paused, Calibrating | Printing) => out.push(Emission::new(EventKind::Resume)),
            (Calibrating | Printing, Paused) => out.push(Emission::new(EventKind::Pause)),
            _ => {}
        }

        if next.is_active() && !prev.is_active() {
            self.fire_start(session, StartTrigger::ProcessStart, out);
        }
        if next == Printing {
            self.fire_start(session, StartTrigger::PrintBegin, out);
        }

        if !prev.is_active() {
            return;
        }
        match next {
            Finished => {
                let kind = match self.finish {
                    FinishTrigger::ProcessEnd => Some(EventKind::ProcessEnd),
                    FinishTrigger::PrintEnd => Some(EventKind::PrintEnd),
                    FinishTrigger::Off => None,
                };
                if let Some(kind) = kind {
                    self.fire_finish(session, kind, out);
                }
                session.end();
            }
            Failed => {
                if self.failure && !session.fired_failure() {
                    out.push(Emission::new(EventKind::PrintFailure));
                }
                session.mark_failure();
                session.end();
            }
            Idle => session.end(),
            _ => {}
        }
    }

    /// Start trigger that depends on extrusion rather than a transition.
    ///
    /// Called for printing snapshots of a live session, before milestones.
    pub fn observe_extrusion(
        &self,
        session: &mut JobSession,
        snapshot: &Snapshot,
        out: &mut Vec<Emission>,
    ) {
        if snapshot.current_layer().is_some_and(|layer| layer >= 1) {
            self.fire_start(session, StartTrigger::ExtrusionStart, out);
        }
    }

    /// Physical completion: the last layer has been reached while printing.
    ///
    /// Called for printing snapshots of a live session, after milestones.
    pub fn observe_completion(
        &self,
        session: &mut JobSession,
        snapshot: &Snapshot,
        out: &mut Vec<Emission>,
    ) {
        if self.finish != FinishTrigger::PrintEnd {
            return;
        }
        let (Some(current), Some(total)) = (snapshot.current_layer(), snapshot.total_layers())
        else {
            return;
        };
        if total > 0 && current >= total {
            self.fire_finish(session, EventKind::PrintEnd, out);
        }
    }

    fn fire_start(&self, session: &mut JobSession, trigger: StartTrigger, out: &mut Vec<Emission>) {
        if self.start != trigger || session.fired_start() {
            return;
        }
        let kind = match trigger {
            StartTrigger::ProcessStart => EventKind::ProcessStart,
            StartTrigger::PrintBegin => EventKind::PrintBegin,
            StartTrigger::ExtrusionStart => EventKind::ExtrusionStart,
            StartTrigger::Off => return,
        };
        session.mark_start();
        out.push(Emission::with_context(kind, EventContext::None));
    }

    fn fire_finish(&self, session: &mut JobSession, kind: EventKind, out: &mut Vec<Emission>) {
        if session.fired_finish() {
            return;
        }
        session.mark_finish();
        out.push(Emission::new(kind));
    }
}
