//! Normalization of vendor phase codes into [`LifecyclePhase`].
//!
//! Bambu firmware reports a coarse `gcode_state` string and a numeric
//! `stg_cur` stage. Only this module knows that vocabulary; everything
//! downstream sees the closed enum.

use serde::{Deserialize, Serialize};

/// Normalized coarse printer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// No job running.
    #[default]
    Idle,
    /// Pre-print work: heating, levelling, homing, nozzle cleaning.
    Calibrating,
    /// Extruding the model.
    Printing,
    /// Paused by the user or by the firmware.
    Paused,
    /// Job completed.
    Finished,
    /// Job aborted or errored.
    Failed,
}

impl LifecyclePhase {
    /// Calibrating, printing or paused.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            LifecyclePhase::Calibrating | LifecyclePhase::Printing | LifecyclePhase::Paused
        )
    }

    /// Finished or failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecyclePhase::Finished | LifecyclePhase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "idle",
            LifecyclePhase::Calibrating => "calibrating",
            LifecyclePhase::Printing => "printing",
            LifecyclePhase::Paused => "paused",
            LifecyclePhase::Finished => "finished",
            LifecyclePhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `stg_cur` stage code says about the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageClass {
    PrePrint,
    Printing,
    Paused,
    Idle,
}

/// Known `stg_cur` / `mc_print_sub_stage` codes.
const STAGES: &[(i64, &str, StageClass)] = &[
    (-1, "Idle", StageClass::Idle),
    (0, "Printing", StageClass::Printing),
    (1, "Auto bed leveling", StageClass::PrePrint),
    (2, "Heatbed preheating", StageClass::PrePrint),
    (3, "Sweeping XY mech mode", StageClass::PrePrint),
    (4, "Changing filament", StageClass::Printing),
    (5, "M400 pause", StageClass::Paused),
    (6, "Paused due to filament runout", StageClass::Paused),
    (7, "Heating hotend", StageClass::PrePrint),
    (8, "Calibrating extrusion", StageClass::PrePrint),
    (9, "Scanning bed surface", StageClass::PrePrint),
    (10, "Inspecting first layer", StageClass::Printing),
    (11, "Identifying build plate type", StageClass::PrePrint),
    (12, "Calibrating micro lidar", StageClass::PrePrint),
    (13, "Homing toolhead", StageClass::PrePrint),
    (14, "Cleaning nozzle tip", StageClass::PrePrint),
    (15, "Checking extruder temperature", StageClass::PrePrint),
    (16, "Paused by the user", StageClass::Paused),
    (17, "Pause of front cover falling", StageClass::Paused),
    (18, "Calibrating the micro lidar", StageClass::PrePrint),
    (19, "Calibrating extrusion flow", StageClass::PrePrint),
    (20, "Paused due to nozzle temperature malfunction", StageClass::Paused),
    (21, "Paused due to heat bed temperature malfunction", StageClass::Paused),
    (22, "Filament unloading", StageClass::Printing),
    (23, "Skip step pause", StageClass::Paused),
    (24, "Filament loading", StageClass::Printing),
    (25, "Motor noise calibration", StageClass::PrePrint),
    (26, "Paused due to AMS lost", StageClass::Paused),
    (27, "Paused due to low speed of the heat break fan", StageClass::Paused),
    (28, "Paused due to chamber temperature control error", StageClass::Paused),
    (29, "Cooling chamber", StageClass::PrePrint),
    (30, "Paused by the Gcode inserted by user", StageClass::Paused),
    (31, "Motor noise showoff", StageClass::PrePrint),
    (32, "Nozzle filament covered detected pause", StageClass::Paused),
    (33, "Cutter error pause", StageClass::Paused),
    (34, "First layer error pause", StageClass::Paused),
    (35, "Nozzle clog pause", StageClass::Paused),
    (255, "Idle", StageClass::Idle),
];

fn lookup_stage(code: i64) -> Option<&'static (i64, &'static str, StageClass)> {
    STAGES.iter().find(|(c, _, _)| *c == code)
}

/// Human description of a stage code, if known.
pub fn stage_description(code: i64) -> Option<&'static str> {
    lookup_stage(code).map(|(_, description, _)| *description)
}

/// Map raw `gcode_state` and `stg_cur` onto a lifecycle phase.
///
/// Returns `None` for anything unrecognized; callers treat that as "no
/// information" rather than an error.
pub fn normalize(gcode_state: Option<&str>, stage: Option<i64>) -> Option<LifecyclePhase> {
    let state = gcode_state?.trim().to_ascii_lowercase();
    match state.as_str() {
        "idle" | "standby" => Some(LifecyclePhase::Idle),
        "prepare" | "preparing" | "slicing" => Some(LifecyclePhase::Calibrating),
        "running" | "printing" => Some(running_phase(stage)),
        "pause" | "paused" => Some(LifecyclePhase::Paused),
        "finish" | "finished" | "completed" => Some(LifecyclePhase::Finished),
        s if s.contains("fail") || s.contains("error") => Some(LifecyclePhase::Failed),
        _ => None,
    }
}

/// `RUNNING` covers the whole job after slicing, so the stage decides.
fn running_phase(stage: Option<i64>) -> LifecyclePhase {
    match stage.and_then(lookup_stage).map(|(_, _, class)| *class) {
        Some(StageClass::PrePrint) => LifecyclePhase::Calibrating,
        Some(StageClass::Paused) => LifecyclePhase::Paused,
        Some(StageClass::Printing) | Some(StageClass::Idle) | None => LifecyclePhase::Printing,
    }
}
