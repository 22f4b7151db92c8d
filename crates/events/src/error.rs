use thiserror::Error;

/// Errors raised when handing an event to an outbound channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel buffer is full; the event was not accepted.
    #[error("Channel '{channel}' is full")]
    Full { channel: String },

    /// The consuming side of the channel is gone.
    #[error("Channel '{channel}' is closed")]
    Closed { channel: String },

    /// A channel must buffer at least one event.
    #[error("Channel '{channel}' needs a capacity of at least 1")]
    InvalidCapacity { channel: String },

    /// The event could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while consuming events from a channel.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The payload is not a valid event.
    #[error("Failed to decode event: {0}")]
    Decode(#[from] serde_json::Error),

    /// A CREATE event arrived without its entity.
    #[error("Missing data for {event_type} event with key {key}")]
    MissingData { event_type: String, key: String },

    /// The handler could not apply the event.
    #[error("Handler failed: {0}")]
    Handler(String),
}

/// Result type for publishing.
pub type Result<T> = std::result::Result<T, ChannelError>;
