//! printwatch engine - orchestration layer
//!
//! Connects the pure tracker in `printwatch-core` to the outside world:
//! - a bounded hand-off queue from the listener into one processing task
//! - pluggable event delivery through [`sink::EventSink`]
//! - durable session checkpoints
//! - layered settings (TOML file plus `PRINTWATCH_*` environment)
//! - the `analyze` and `replay` commands used by the CLI

pub mod checkpoint;
pub mod commands;
pub mod errors;
pub mod pipeline;
pub mod settings;
pub mod sink;

pub use pipeline::{spawn_processor, SnapshotSender};
pub use settings::{load_settings, ReplayPolicy, Settings};
pub use sink::{ChannelSink, EventSink, LogSink};
