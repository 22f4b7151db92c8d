//! Recommendation service trait and in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::Recommendation;
use tokio::sync::RwLock;

use super::CallCounts;
use crate::error::{IntegrationError, Result};

/// Operations offered by the recommendation service.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Creates a recommendation and returns the stored entity.
    async fn create_recommendation(&self, body: Recommendation) -> Result<Recommendation>;

    /// Lists the recommendations of a product in storage order.
    async fn get_recommendations(&self, product_id: ProductId) -> Result<Vec<Recommendation>>;

    /// Deletes every recommendation of a product. Succeeds when there are none.
    async fn delete_recommendations(&self, product_id: ProductId) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemoryRecommendationState {
    recommendations: Vec<Recommendation>,
    calls: CallCounts,
    unavailable: bool,
}

/// In-memory recommendation service for tests and local runs.
#[derive(Debug, Clone)]
pub struct InMemoryRecommendationService {
    state: Arc<RwLock<InMemoryRecommendationState>>,
    service_address: String,
}

impl Default for InMemoryRecommendationService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecommendationService {
    pub fn new() -> Self {
        Self::with_service_address("in-memory-recommendation")
    }

    pub fn with_service_address(address: impl Into<String>) -> Self {
        Self {
            state: Arc::default(),
            service_address: address.into(),
        }
    }

    /// Makes every subsequent call fail with `Unavailable`.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.read().await.calls
    }

    pub async fn recommendation_count(&self) -> usize {
        self.state.read().await.recommendations.len()
    }
}

fn unavailable() -> IntegrationError {
    IntegrationError::unavailable("in-memory://recommendation", "service unavailable")
}

#[async_trait]
impl RecommendationService for InMemoryRecommendationService {
    async fn create_recommendation(&self, body: Recommendation) -> Result<Recommendation> {
        let mut state = self.state.write().await;
        state.calls.create += 1;
        if state.unavailable {
            return Err(unavailable());
        }

        let duplicate = state.recommendations.iter().any(|r| {
            r.product_id == body.product_id && r.recommendation_id == body.recommendation_id
        });
        if duplicate {
            return Err(IntegrationError::InvalidInput(format!(
                "Duplicate key, Product Id: {}, Recommendation Id: {}",
                body.product_id, body.recommendation_id
            )));
        }

        let stored = body.with_service_address(self.service_address.clone());
        state.recommendations.push(stored.clone());
        Ok(stored)
    }

    async fn get_recommendations(&self, product_id: ProductId) -> Result<Vec<Recommendation>> {
        let mut state = self.state.write().await;
        state.calls.get += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        if !product_id.is_valid() {
            return Err(IntegrationError::InvalidInput(format!(
                "Invalid productId: {product_id}"
            )));
        }

        Ok(state
            .recommendations
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn delete_recommendations(&self, product_id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        state.calls.delete += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        state.recommendations.retain(|r| r.product_id != product_id);
        Ok(())
    }
}
