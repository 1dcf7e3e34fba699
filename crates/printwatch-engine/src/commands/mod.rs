//! Command orchestration for the CLI
//!
//! Each public entry point owns its operation boundary:
//! - `log_op_start!` at entry
//! - `log_op_end!` / `log_op_error!` at exit
//!
//! Lower layers use only `tracing::debug!()` for internal details.

pub mod analyze;
pub mod replay;

pub use analyze::{analyze_log, AnalyzeMode, AnalyzeRequest, AnalyzeResult};
pub use replay::{replay_log, ReplayResult};
