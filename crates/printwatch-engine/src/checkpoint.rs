//! Durable session checkpoints
//!
//! Uses temp→rename so a crash never leaves a partial checkpoint behind.

use crate::errors::{checkpoint_corrupt, io_error, serialization_error, Result};
use printwatch_core::{Event, JobSession};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to resume tracking after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session: JobSession,
    /// Detected events not yet accepted by the sink.
    pub pending: Vec<Event>,
}

/// Atomically write bytes to a file
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_checkpoint_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| io_error("write_checkpoint_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_checkpoint_temp", e))?;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last checkpoint, or `None` if there is none yet.
    pub fn load(&self) -> Result<Option<Checkpoint>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read_checkpoint", e)),
        };
        let checkpoint =
            serde_json::from_slice(&bytes).map_err(|e| checkpoint_corrupt(&self.path, e))?;
        Ok(Some(checkpoint))
    }

    pub fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(checkpoint)
            .map_err(|e| serialization_error("save_checkpoint", e))?;
        atomic_write(&self.path, &bytes)
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("clear_checkpoint", e)),
        }
    }
}
