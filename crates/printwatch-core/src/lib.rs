//! printwatch core - interpretation of 3D printer status streams
//!
//! This crate turns a stream of raw printer status snapshots into a small
//! set of meaningful notifications, and analyzes recorded status logs:
//! - Snapshot normalization (vendor phase codes into a lifecycle enum)
//! - Per-job sessions with once-only milestones
//! - Lifecycle event detection (start, pause/resume, finish, failure)
//! - Field-level diffs with per-field tolerances
//! - Offline diff and watch queries over JSON Lines logs
//!
//! Nothing here performs network I/O; the async hand-off and delivery live
//! in `printwatch-engine`.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod diff;
pub mod errors;
pub mod event;
pub mod logging_facility;
pub mod progress;
pub mod session;
pub mod snapshot;
pub mod tracker;

// Used by the logging macros
pub use printwatch_core_types;

// Re-export commonly used types
pub use config::{NotifyConfig, ResolvedConfig};
pub use errors::{ExError, ExErrorKind, PrintwatchError, Result};
pub use event::{Event, EventContext, EventKind};
pub use session::JobSession;
pub use snapshot::{LifecyclePhase, Snapshot};
pub use tracker::Tracker;
