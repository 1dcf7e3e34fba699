//! Layered runtime settings.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `PRINTWATCH_*` environment variables, with `__` separating nesting
//!    (e.g. `PRINTWATCH_NOTIFY__PERCENTAGE_MODE=layer`)

use crate::errors::{settings_error, Result};
use config::{Config, Environment, File, Map};
use printwatch_core::config::{NotifyConfig, ResolvedConfig};
use printwatch_core::errors::{ExError, PrintwatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "PRINTWATCH";

/// What to do with events that were detected but not delivered before the
/// last shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Drop them; the restored session already has their milestones fired.
    #[default]
    Suppress,
    /// Deliver them again before processing new snapshots.
    Redeliver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notify: NotifyConfig,
    /// Where to persist the session between runs. No checkpointing if unset.
    pub checkpoint_path: Option<PathBuf>,
    pub replay_policy: ReplayPolicy,
    /// Capacity of the snapshot hand-off queue.
    pub queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notify: NotifyConfig::default(),
            checkpoint_path: None,
            replay_policy: ReplayPolicy::Suppress,
            queue_capacity: 64,
        }
    }
}

impl Settings {
    /// Validate everything and resolve the notification options.
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_CONFIG` / `ERR_INVALID_TOLERANCE` for bad options.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        if self.queue_capacity == 0 {
            return Err(PrintwatchError::InvalidConfig {
                reason: "queue_capacity must be at least 1".to_string(),
            }
            .into());
        }
        self.notify.resolve().map_err(ExError::from)
    }
}

/// Load settings from an optional TOML file and the process environment.
///
/// # Errors
///
/// `ERR_INVALID_CONFIG` when the file is missing or any source fails to
/// deserialize.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    build(path, None)
}

fn build(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Settings> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("notify.report_percentages")
            .with_list_parse_key("notify.tolerance")
            .source(env),
    );

    let settings: Settings = builder
        .build()
        .map_err(settings_error)?
        .try_deserialize()
        .map_err(settings_error)?;

    tracing::debug!(
        file = path.map(|p| p.display().to_string()).unwrap_or_default(),
        checkpoint = settings.checkpoint_path.is_some(),
        queue_capacity = settings.queue_capacity,
        "Loaded settings"
    );
    Ok(settings)
}
