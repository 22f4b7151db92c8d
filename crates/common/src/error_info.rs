//! Error envelope shared by every service in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body returned by a service when a request fails.
///
/// Downstream services emit the same shape, which is how a composite
/// request forwards the original message instead of a generic one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub status: u16,
    /// Canonical reason phrase for `status`, e.g. `"Not Found"`.
    pub error: String,
    pub message: String,
}

impl HttpErrorInfo {
    /// Creates an envelope stamped with the current time.
    pub fn new(
        status: u16,
        error: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.into(),
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Extracts `message` from a raw error body.
    ///
    /// Only `message` is required; bodies produced by other stacks may carry
    /// the status as a string or omit the timestamp.
    pub fn message_from_body(body: &str) -> Option<String> {
        #[derive(Deserialize)]
        struct MessageOnly {
            message: String,
        }

        serde_json::from_str::<MessageOnly>(body)
            .ok()
            .map(|m| m.message)
    }
}
