//! Outbound channels, one per entity kind.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::{ChannelError, Result};
use crate::event::Event;

/// A destination that accepts JSON-encoded events without waiting for them
/// to be processed.
pub trait MessageChannel: Send + Sync {
    /// Name of the channel, used in logs and metrics.
    fn name(&self) -> &str;

    /// Hands a payload to the channel. Returns once the channel accepted it.
    fn send(&self, payload: String) -> Result<()>;
}

/// Encodes `event` as JSON and sends it on `channel`.
#[tracing::instrument(skip_all, fields(channel = channel.name(), event_type = %event.event_type()))]
pub fn publish<K: Serialize, T: Serialize>(
    channel: &dyn MessageChannel,
    event: &Event<K, T>,
) -> Result<()> {
    let payload = serde_json::to_string(event)?;
    channel.send(payload)?;

    metrics::counter!("events_published_total", "channel" => channel.name().to_string())
        .increment(1);
    tracing::debug!("event published");
    Ok(())
}

/// Channel backed by a bounded tokio mpsc queue.
///
/// Sending never waits: a full buffer is reported as [`ChannelError::Full`].
#[derive(Debug, Clone)]
pub struct MpscChannel {
    name: String,
    tx: mpsc::Sender<String>,
}

impl MpscChannel {
    /// Creates a channel and returns the receiver its consumer reads from.
    ///
    /// A capacity of 0 is rejected with [`ChannelError::InvalidCapacity`].
    pub fn bounded(
        name: impl Into<String>,
        capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<String>)> {
        let name = name.into();
        if capacity == 0 {
            return Err(ChannelError::InvalidCapacity { channel: name });
        }

        let (tx, rx) = mpsc::channel(capacity);
        Ok((Self { name, tx }, rx))
    }
}

impl MessageChannel for MpscChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, payload: String) -> Result<()> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => ChannelError::Full {
                channel: self.name.clone(),
            },
            TrySendError::Closed(_) => ChannelError::Closed {
                channel: self.name.clone(),
            },
        })
    }
}

/// The three outbound channels used by the event write path.
#[derive(Clone)]
pub struct MessageSources {
    pub products: Arc<dyn MessageChannel>,
    pub recommendations: Arc<dyn MessageChannel>,
    pub reviews: Arc<dyn MessageChannel>,
}

/// Receiving ends of channels created by [`MessageSources::bounded`].
#[derive(Debug)]
pub struct MessageSinks {
    pub products: mpsc::Receiver<String>,
    pub recommendations: mpsc::Receiver<String>,
    pub reviews: mpsc::Receiver<String>,
}

impl MessageSources {
    pub const OUTPUT_PRODUCTS: &'static str = "output-products";
    pub const OUTPUT_RECOMMENDATIONS: &'static str = "output-recommendations";
    pub const OUTPUT_REVIEWS: &'static str = "output-reviews";

    pub fn new(
        products: Arc<dyn MessageChannel>,
        recommendations: Arc<dyn MessageChannel>,
        reviews: Arc<dyn MessageChannel>,
    ) -> Self {
        Self {
            products,
            recommendations,
            reviews,
        }
    }

    /// Creates three mpsc-backed channels with the given capacity each.
    pub fn bounded(capacity: usize) -> Result<(Self, MessageSinks)> {
        let (products, products_rx) = MpscChannel::bounded(Self::OUTPUT_PRODUCTS, capacity)?;
        let (recommendations, recommendations_rx) =
            MpscChannel::bounded(Self::OUTPUT_RECOMMENDATIONS, capacity)?;
        let (reviews, reviews_rx) = MpscChannel::bounded(Self::OUTPUT_REVIEWS, capacity)?;

        Ok((
            Self::new(Arc::new(products), Arc::new(recommendations), Arc::new(reviews)),
            MessageSinks {
                products: products_rx,
                recommendations: recommendations_rx,
                reviews: reviews_rx,
            },
        ))
    }
}

impl std::fmt::Debug for MessageSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSources")
            .field("products", &self.products.name())
            .field("recommendations", &self.recommendations.name())
            .field("reviews", &self.reviews.name())
            .finish()
    }
}
