//! Health of the leaf services as seen from the composite.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

/// Result of probing one leaf service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down { reason: String },
}

impl HealthStatus {
    pub fn down(reason: impl Into<String>) -> Self {
        HealthStatus::Down {
            reason: reason.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

/// Probes the leaf services an adapter talks to.
///
/// A failed probe is reported as `Down`, never as an error.
#[async_trait]
pub trait DownstreamHealth: Send + Sync {
    async fn health(&self) -> BTreeMap<String, HealthStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Up).unwrap(),
            serde_json::json!({"status": "UP"})
        );
        assert_eq!(
            serde_json::to_value(HealthStatus::down("connection refused")).unwrap(),
            serde_json::json!({"status": "DOWN", "reason": "connection refused"})
        );
    }
}
