//! Percentage and layer milestones.

use crate::config::{PercentageMode, ResolvedConfig};
use crate::event::{Emission, EventContext, EventKind};
use crate::session::JobSession;
use crate::snapshot::Snapshot;

/// Fires each configured milestone at most once per session.
///
/// Holds only configuration; all fired state lives in the [`JobSession`].
#[derive(Debug, Clone)]
pub struct ProgressMilestoneTracker {
    mode: PercentageMode,
    thresholds: Vec<u8>,
    first_layer: bool,
    second_layer: bool,
}

impl ProgressMilestoneTracker {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            mode: config.percentage_mode,
            thresholds: config.thresholds.clone(),
            first_layer: config.first_layer,
            second_layer: config.second_layer,
        }
    }

    /// Progress of `snapshot` in the configured mode.
    ///
    /// Layer mode yields `None` until the total layer count is known.
    pub fn percentage(&self, snapshot: &Snapshot) -> Option<u8> {
        match self.mode {
            PercentageMode::Time => snapshot.percent_time_based(),
            PercentageMode::Layer => {
                let total = u64::from(snapshot.total_layers().filter(|t| *t > 0)?);
                let current = u64::from(snapshot.current_layer()?);
                Some((current * 100 / total).min(100) as u8)
            }
        }
    }

    /// Append milestones reached by `snapshot`: layers first, then
    /// percentages in ascending order.
    pub fn observe(&self, session: &mut JobSession, snapshot: &Snapshot, out: &mut Vec<Emission>) {
        match snapshot.current_layer() {
            Some(1) if self.first_layer && !session.fired_first_layer() => {
                session.mark_first_layer();
                out.push(Emission::with_context(
                    EventKind::FirstLayerDone,
                    EventContext::Layer(1),
                ));
            }
            Some(2) if self.second_layer && !session.fired_second_layer() => {
                session.mark_second_layer();
                out.push(Emission::with_context(
                    EventKind::SecondLayerDone,
                    EventContext::Layer(2),
                ));
            }
            _ => {}
        }

        let Some(pct) = self.percentage(snapshot) else {
            return;
        };
        for &threshold in self.thresholds.iter().take_while(|t| **t <= pct) {
            if session.mark_percentage(threshold) {
                out.push(Emission::with_context(
                    EventKind::ProgressPercent,
                    EventContext::Percentage(threshold),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn snap(report: serde_json::Value) -> Snapshot {
        Snapshot::from_report(&report, DateTime::UNIX_EPOCH).unwrap()
    }

    fn tracker(mode: PercentageMode, thresholds: &[u8]) -> ProgressMilestoneTracker {
        ProgressMilestoneTracker::new(&ResolvedConfig {
            percentage_mode: mode,
            thresholds: thresholds.to_vec(),
            ..ResolvedConfig::default()
        })
    }

    fn percentages(out: &[Emission]) -> Vec<u8> {
        out.iter()
            .filter_map(|e| match e.context {
                EventContext::Percentage(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layer_percentage_floors_and_caps() {
        let t = tracker(PercentageMode::Layer, &[]);
        let pct = |cur: u32, total: u32| {
            t.percentage(&snap(json!({"layer_num": cur, "total_layer_num": total})))
        };
        assert_eq!(pct(1, 3), Some(33));
        assert_eq!(pct(12, 10), Some(100));
        assert_eq!(pct(5, 0), None);
        assert_eq!(t.percentage(&snap(json!({"layer_num": 5}))), None);
    }

    #[test]
    fn test_thresholds_fire_ascending_once() {
        let t = tracker(PercentageMode::Time, &[25, 50, 75]);
        let mut session = JobSession::idle();

        let mut out = Vec::new();
        t.observe(&mut session, &snap(json!({"mc_percent": 40})), &mut out);
        assert_eq!(percentages(&out), vec![25]);

        out.clear();
        t.observe(&mut session, &snap(json!({"mc_percent": 80})), &mut out);
        assert_eq!(percentages(&out), vec![50, 75]);

        out.clear();
        t.observe(&mut session, &snap(json!({"mc_percent": 80})), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_layer_milestones_fire_on_exact_layer() {
        let t = tracker(PercentageMode::Time, &[]);
        let mut session = JobSession::idle();
        let mut out = Vec::new();

        t.observe(&mut session, &snap(json!({"layer_num": 3})), &mut out);
        assert!(out.is_empty());

        t.observe(&mut session, &snap(json!({"layer_num": 1})), &mut out);
        t.observe(&mut session, &snap(json!({"layer_num": 1})), &mut out);
        t.observe(&mut session, &snap(json!({"layer_num": 2})), &mut out);
        let kinds: Vec<_> = out.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::FirstLayerDone, EventKind::SecondLayerDone]
        );
    }

    #[test]
    fn test_disabled_layer_milestones_stay_silent() {
        let t = ProgressMilestoneTracker::new(&ResolvedConfig {
            first_layer: false,
            second_layer: false,
            thresholds: vec![],
            ..ResolvedConfig::default()
        });
        let mut session = JobSession::idle();
        let mut out = Vec::new();
        t.observe(&mut session, &snap(json!({"layer_num": 1})), &mut out);
        assert!(out.is_empty());
        assert!(!session.fired_first_layer());
    }
}
