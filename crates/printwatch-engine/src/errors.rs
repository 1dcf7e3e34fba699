//! Error handling for printwatch-engine
//!
//! Wraps printwatch-core ExError with engine-specific helpers

use printwatch_core::errors::{ExError, ExErrorKind, PrintwatchError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a settings error from the config crate
pub fn settings_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_settings")
        .with_message(err.to_string())
}

/// Create a checkpoint decoding error
pub fn checkpoint_corrupt(path: &std::path::Path, err: serde_json::Error) -> ExError {
    PrintwatchError::CheckpointCorrupt {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a background task that panicked or was cancelled
pub fn join_error(task: &str, err: tokio::task::JoinError) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(task.to_string())
        .with_message(err.to_string())
}
