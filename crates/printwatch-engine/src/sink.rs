//! Event delivery port.
//!
//! The processing loop hands every event to an [`EventSink`]. Adapters
//! decide where it goes: a channel to a notifier task, the log, a webhook.

use crate::errors::Result;
use async_trait::async_trait;
use printwatch_core::errors::PrintwatchError;
use printwatch_core::snapshot::format_remaining;
use printwatch_core::{Event, EventContext};
use tokio::sync::mpsc;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event. An error leaves the event pending.
    async fn dispatch(&self, event: &Event) -> Result<()>;
}

/// Forwards events to a separate consumer task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Event>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// A sink plus the receiving end for the consumer.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn dispatch(&self, event: &Event) -> Result<()> {
        self.tx.send(event.clone()).await.map_err(|_| {
            PrintwatchError::DispatchFailed {
                event_kind: event.kind.to_string(),
                reason: "event consumer has shut down".to_string(),
            }
            .into()
        })
    }
}

/// Writes each event to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn dispatch(&self, event: &Event) -> Result<()> {
        let detail = match event.context {
            EventContext::Percentage(p) => format!("{}%", p),
            EventContext::Layer(l) => format!("layer {}", l),
            EventContext::None => String::new(),
        };
        let remaining = event
            .snapshot
            .remaining_minutes()
            .map(format_remaining)
            .unwrap_or_default();

        tracing::info!(
            session_id = %event.session_id,
            job_id = event.job_identifier.as_deref().unwrap_or(""),
            event_kind = event.kind.as_str(),
            print_name = %event.snapshot.print_name(),
            detail = %detail,
            remaining = %remaining,
            "Print event"
        );
        Ok(())
    }
}
