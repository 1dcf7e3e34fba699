//! Snapshot hand-off and the single processing loop.
//!
//! ```text
//!   listener ──▶ SnapshotSender ──(bounded mpsc)──▶ processing task ──▶ EventSink
//!                                                    (owns Tracker)
//! ```
//!
//! Ordering is arrival order. The loop ends when every [`SnapshotSender`]
//! has been dropped and returns the final [`JobSession`].

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::errors::{join_error, Result};
use crate::settings::{ReplayPolicy, Settings};
use crate::sink::EventSink;
use printwatch_core::errors::PrintwatchError;
use printwatch_core::{log_op_end, log_op_error, log_op_start};
use printwatch_core::{Event, JobSession, ResolvedConfig, Snapshot, Tracker};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Listener-side handle of the hand-off queue.
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    tx: mpsc::Sender<Snapshot>,
}

impl SnapshotSender {
    /// Queue a snapshot, waiting while the queue is full.
    pub async fn submit(&self, snapshot: Snapshot) -> Result<()> {
        self.tx
            .send(snapshot)
            .await
            .map_err(|_| PrintwatchError::ChannelClosed.into())
    }

    /// Queue a snapshot from a non-async listener thread.
    ///
    /// Must not be called from within the async runtime.
    pub fn blocking_submit(&self, snapshot: Snapshot) -> Result<()> {
        self.tx
            .blocking_send(snapshot)
            .map_err(|_| PrintwatchError::ChannelClosed.into())
    }
}

/// Start the processing task.
///
/// Restores the session from the checkpoint when one is configured. Must be
/// called from within a Tokio runtime.
///
/// # Errors
///
/// Invalid settings, or an unreadable or corrupt checkpoint.
pub fn spawn_processor<S>(
    settings: &Settings,
    sink: S,
) -> Result<(SnapshotSender, JoinHandle<JobSession>)>
where
    S: EventSink + 'static,
{
    let config = settings.resolve()?;
    let store = settings.checkpoint_path.as_ref().map(CheckpointStore::new);
    let restored = match &store {
        Some(store) => store.load()?,
        None => None,
    };

    let processor = Processor::new(&config, restored, settings.replay_policy, store, sink);
    let (tx, rx) = mpsc::channel(settings.queue_capacity);
    let handle = tokio::spawn(processor.run(rx));
    Ok((SnapshotSender { tx }, handle))
}

struct Processor<S> {
    tracker: Tracker,
    store: Option<CheckpointStore>,
    sink: S,
    /// Detected events the sink has not accepted yet, oldest first.
    pending: Vec<Event>,
}

impl<S: EventSink> Processor<S> {
    fn new(
        config: &ResolvedConfig,
        restored: Option<Checkpoint>,
        policy: ReplayPolicy,
        store: Option<CheckpointStore>,
        sink: S,
    ) -> Self {
        let (tracker, pending) = match restored {
            Some(checkpoint) => {
                tracing::info!(
                    session_id = %checkpoint.session.session_id(),
                    pending = checkpoint.pending.len(),
                    policy = ?policy,
                    "Resuming session from checkpoint"
                );
                let pending = match policy {
                    ReplayPolicy::Redeliver => checkpoint.pending,
                    ReplayPolicy::Suppress => Vec::new(),
                };
                (Tracker::with_session(config, checkpoint.session), pending)
            }
            None => (Tracker::new(config), Vec::new()),
        };
        Self {
            tracker,
            store,
            sink,
            pending,
        }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Snapshot>) -> JobSession {
        if !self.pending.is_empty() {
            self.deliver_pending().await;
            self.persist().await;
        }

        while let Some(snapshot) = rx.recv().await {
            let events = self.tracker.process(snapshot);
            if events.is_empty() {
                continue;
            }
            self.pending.extend(events);
            self.persist().await;
            self.deliver_pending().await;
            self.persist().await;
        }

        tracing::info!(
            session_id = %self.tracker.session().session_id(),
            pending = self.pending.len(),
            "Snapshot queue closed, processing loop finished"
        );
        self.tracker.into_session()
    }

    /// Dispatch every pending event in order, keeping the ones the sink rejects.
    async fn deliver_pending(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in events {
            log_op_start!(
                "dispatch_event",
                session_id = %event.session_id,
                event_kind = event.kind.as_str()
            );
            let start = Instant::now();
            match self.sink.dispatch(&event).await {
                Ok(()) => {
                    log_op_end!(
                        "dispatch_event",
                        duration_ms = start.elapsed().as_millis() as u64,
                        session_id = %event.session_id
                    );
                }
                Err(e) => {
                    log_op_error!(
                        "dispatch_event",
                        e,
                        duration_ms = start.elapsed().as_millis() as u64,
                        session_id = %event.session_id
                    );
                    self.pending.push(event);
                }
            }
        }
    }

    /// Write the session and the full pending list off the async workers.
    async fn persist(&self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let path = store.path().to_path_buf();
        let checkpoint = Checkpoint {
            session: self.tracker.session().clone(),
            pending: self.pending.clone(),
        };
        let result = tokio::task::spawn_blocking(move || store.save(&checkpoint))
            .await
            .map_err(|e| join_error("save_checkpoint", e))
            .and_then(|saved| saved);
        if let Err(e) = result {
            tracing::warn!(
                path = %path.display(),
                err.code = e.code(),
                message = e.message(),
                "Failed to write checkpoint"
            );
        }
    }
}
