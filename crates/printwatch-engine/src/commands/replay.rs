//! Run a recorded log through the live pipeline.

use crate::errors::{join_error, Result};
use crate::pipeline::spawn_processor;
use crate::settings::Settings;
use crate::sink::ChannelSink;
use printwatch_core::analyzer::{load_log, to_snapshots};
use printwatch_core::errors::ExError;
use printwatch_core::{log_op_end, log_op_error, log_op_start};
use printwatch_core::{Event, JobSession};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub snapshot_count: usize,
    pub events: Vec<Event>,
    /// Session state after the last snapshot.
    pub session: JobSession,
}

/// Feed every entry of a log to a fresh tracker and collect its events.
///
/// Checkpointing is disabled for replays regardless of `settings`.
///
/// # Errors
///
/// Invalid settings, an unreadable or malformed log, or a failed
/// processing task.
pub async fn replay_log(path: &Path, settings: &Settings) -> Result<ReplayResult> {
    log_op_start!("replay_log", path = %path.display());
    let start = std::time::Instant::now();

    let result = replay_log_impl(path, settings).await.map_err(|e| {
        log_op_error!(
            "replay_log",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "replay_log",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_count = result.snapshot_count,
        event_count = result.events.len()
    );

    Ok(result)
}

async fn replay_log_impl(path: &Path, settings: &Settings) -> Result<ReplayResult> {
    let settings = Settings {
        checkpoint_path: None,
        ..settings.clone()
    };
    let entries = load_log(path).map_err(ExError::from)?;
    let snapshots = to_snapshots(&entries);
    let snapshot_count = snapshots.len();

    let (sink, mut rx) = ChannelSink::channel(settings.queue_capacity.max(1));
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let (sender, processor) = spawn_processor(&settings, sink)?;
    for snapshot in snapshots {
        sender.submit(snapshot).await?;
    }
    drop(sender);

    let session = processor
        .await
        .map_err(|e| join_error("replay_processor", e))?;
    let events = collector
        .await
        .map_err(|e| join_error("replay_collector", e))?;

    Ok(ReplayResult {
        snapshot_count,
        events,
        session,
    })
}
