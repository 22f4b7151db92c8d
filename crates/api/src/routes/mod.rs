//! HTTP route handlers.

pub mod composite;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use ::composite::ProductCompositeService;
use integration::DownstreamHealth;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub composite: Arc<dyn ProductCompositeService>,
    pub downstream: Arc<dyn DownstreamHealth>,
}

impl AppState {
    pub fn new(
        composite: Arc<dyn ProductCompositeService>,
        downstream: Arc<dyn DownstreamHealth>,
    ) -> Self {
        Self {
            composite,
            downstream,
        }
    }
}
