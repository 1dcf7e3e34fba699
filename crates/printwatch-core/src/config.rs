//! Notification configuration.
//!
//! [`NotifyConfig`] is the user-facing, serde-friendly shape. It is resolved
//! once at startup into [`ResolvedConfig`], which the tracker consumes; no
//! component re-reads the raw options per snapshot.

use crate::diff::Tolerances;
use crate::errors::{PrintwatchError, Result};
use serde::{Deserialize, Serialize};

/// Where progress percentages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageMode {
    /// The printer's own time-based `mc_percent`.
    #[default]
    Time,
    /// `current_layer / total_layers`.
    Layer,
}

/// Which underlying transition is reported as "the print started".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartTrigger {
    Off,
    /// First entry into any active phase (usually idle → calibrating).
    #[default]
    ProcessStart,
    /// First entry into printing.
    PrintBegin,
    /// First printing snapshot with a layer on the plate.
    ExtrusionStart,
}

/// Which underlying transition is reported as "the print finished".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishTrigger {
    Off,
    /// Last layer reached, before post-print motion.
    PrintEnd,
    /// The printer reports the job finished.
    #[default]
    ProcessEnd,
}

/// Raw notification options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub percentage_mode: PercentageMode,
    pub report_start_event: StartTrigger,
    pub report_finish_event: FinishTrigger,
    pub report_percentages: Vec<i64>,
    /// Also report every multiple of this step (e.g. 10 → 10, 20, … 100).
    pub report_every_percent: Option<u8>,
    pub report_first_layer: bool,
    pub report_second_layer: bool,
    pub report_failure: bool,
    /// Treat the first snapshot after startup as a baseline and emit nothing for it.
    pub suppress_initial_events: bool,
    /// `field:threshold` entries for diffing.
    pub tolerance: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            percentage_mode: PercentageMode::Time,
            report_start_event: StartTrigger::ProcessStart,
            report_finish_event: FinishTrigger::ProcessEnd,
            report_percentages: vec![50],
            report_every_percent: None,
            report_first_layer: true,
            report_second_layer: true,
            report_failure: true,
            suppress_initial_events: false,
            tolerance: Vec::new(),
        }
    }
}

impl NotifyConfig {
    /// Validate and resolve into the fixed form used by the tracker.
    ///
    /// # Errors
    ///
    /// - `InvalidThreshold` for a percentage outside 0..=100
    /// - `InvalidConfig` for `report_every_percent = 0`
    /// - `InvalidTolerance` for a malformed tolerance entry
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let mut thresholds = Vec::with_capacity(self.report_percentages.len());
        for &value in &self.report_percentages {
            let pct = u8::try_from(value)
                .ok()
                .filter(|p| *p <= 100)
                .ok_or(PrintwatchError::InvalidThreshold { value })?;
            thresholds.push(pct);
        }

        match self.report_every_percent {
            Some(0) => {
                return Err(PrintwatchError::InvalidConfig {
                    reason: "report_every_percent must be at least 1".to_string(),
                })
            }
            Some(step) => thresholds.extend((step..=100).step_by(step as usize)),
            None => {}
        }

        thresholds.sort_unstable();
        thresholds.dedup();

        Ok(ResolvedConfig {
            percentage_mode: self.percentage_mode,
            thresholds,
            start: self.report_start_event,
            finish: self.report_finish_event,
            first_layer: self.report_first_layer,
            second_layer: self.report_second_layer,
            failure: self.report_failure,
            suppress_initial_events: self.suppress_initial_events,
            tolerances: Tolerances::from_specs(&self.tolerance)?,
        })
    }
}

/// Validated configuration, fixed for the lifetime of a tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub percentage_mode: PercentageMode,
    /// Ascending, deduplicated, all within 0..=100.
    pub thresholds: Vec<u8>,
    pub start: StartTrigger,
    pub finish: FinishTrigger,
    pub first_layer: bool,
    pub second_layer: bool,
    pub failure: bool,
    pub suppress_initial_events: bool,
    pub tolerances: Tolerances,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            percentage_mode: PercentageMode::Time,
            thresholds: vec![50],
            start: StartTrigger::ProcessStart,
            finish: FinishTrigger::ProcessEnd,
            first_layer: true,
            second_layer: true,
            failure: true,
            suppress_initial_events: false,
            tolerances: Tolerances::new(),
        }
    }
}
