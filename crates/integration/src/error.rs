//! Errors returned by downstream clients.

use events::ChannelError;
use thiserror::Error;

/// Failure of a call to a leaf service.
///
/// `NotFound` and `InvalidInput` display the downstream message unchanged so
/// it can be forwarded to the caller as-is.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The requested entity does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// The leaf service rejected the input (HTTP 422).
    #[error("{0}")]
    InvalidInput(String),

    /// Any other non-2xx response.
    #[error("Unexpected HTTP status {status}: {message}")]
    UnexpectedStatus {
        status: u16,
        message: String,
        body: String,
    },

    /// The service could not be reached or did not answer in time.
    #[error("Service unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The event channel did not accept an event.
    #[error("Failed to publish event: {0}")]
    Publish(#[from] ChannelError),

    /// The HTTP client could not be built.
    #[error("HTTP client configuration error: {0}")]
    Configuration(String),
}

impl IntegrationError {
    /// Creates an `Unavailable` error for `url`.
    pub fn unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        IntegrationError::Unavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IntegrationError::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, IntegrationError::InvalidInput(_))
    }
}

/// Result type for downstream calls.
pub type Result<T> = std::result::Result<T, IntegrationError>;
