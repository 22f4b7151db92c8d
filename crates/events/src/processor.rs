//! Consumer side of an outbound channel.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::error::ProcessingError;
use crate::event::Event;

/// Applies decoded events to a service.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Type of the event key.
    type Key: DeserializeOwned + Send;
    /// Type of the entity carried by CREATE events.
    type Data: DeserializeOwned + Send;

    /// Applies a single event.
    async fn handle(&self, event: Event<Self::Key, Self::Data>) -> Result<(), ProcessingError>;
}

/// Counts of what a processor did before its channel closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub processed: u64,
    pub failed: u64,
}

/// Decodes JSON payloads from one channel and feeds them to a handler.
pub struct EventProcessor<H> {
    channel: String,
    handler: H,
}

impl<H: EventHandler> EventProcessor<H> {
    pub fn new(channel: impl Into<String>, handler: H) -> Self {
        Self {
            channel: channel.into(),
            handler,
        }
    }

    /// Returns the handler this processor feeds.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Decodes one payload and hands it to the handler.
    #[tracing::instrument(skip(self, payload), fields(channel = %self.channel))]
    pub async fn process(&self, payload: &str) -> Result<(), ProcessingError> {
        let event: Event<H::Key, H::Data> = serde_json::from_str(payload)?;
        tracing::info!(
            event_type = %event.event_type(),
            created_at = %event.created_at(),
            "processing event"
        );
        self.handler.handle(event).await
    }

    /// Processes payloads until every sender of `rx` is dropped.
    ///
    /// A payload that fails is logged and skipped; it does not stop the loop.
    pub async fn run(self, mut rx: mpsc::Receiver<String>) -> ProcessorStats {
        let mut stats = ProcessorStats::default();

        while let Some(payload) = rx.recv().await {
            match self.process(&payload).await {
                Ok(()) => stats.processed += 1,
                Err(e) => {
                    stats.failed += 1;
                    metrics::counter!("events_failed_total", "channel" => self.channel.clone())
                        .increment(1);
                    tracing::warn!(channel = %self.channel, error = %e, "event processing failed");
                }
            }
        }

        tracing::info!(
            channel = %self.channel,
            processed = stats.processed,
            failed = stats.failed,
            "channel closed, processor stopped"
        );
        stats
    }
}
