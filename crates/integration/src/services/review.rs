//! Review service trait and in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::Review;
use tokio::sync::RwLock;

use super::CallCounts;
use crate::error::{IntegrationError, Result};

/// Operations offered by the review service.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Creates a review and returns the stored entity.
    async fn create_review(&self, body: Review) -> Result<Review>;

    /// Lists the reviews of a product in storage order.
    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>>;

    /// Deletes every review of a product. Succeeds when there are none.
    async fn delete_reviews(&self, product_id: ProductId) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    reviews: Vec<Review>,
    calls: CallCounts,
    unavailable: bool,
}

/// In-memory review service for tests and local runs.
#[derive(Debug, Clone)]
pub struct InMemoryReviewService {
    state: Arc<RwLock<InMemoryReviewState>>,
    service_address: String,
}

impl Default for InMemoryReviewService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReviewService {
    pub fn new() -> Self {
        Self::with_service_address("in-memory-review")
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

    pub async fn review_count(&self) -> usize {
        self.state.read().await.reviews.len()
    }
}

fn unavailable() -> IntegrationError {
    IntegrationError::unavailable("in-memory://review", "service unavailable")
}

#[async_trait]
impl ReviewService for InMemoryReviewService {
    async fn create_review(&self, body: Review) -> Result<Review> {
        let mut state = self.state.write().await;
        state.calls.create += 1;
        if state.unavailable {
            return Err(unavailable());
        }

        let duplicate = state
            .reviews
            .iter()
            .any(|r| r.product_id == body.product_id && r.review_id == body.review_id);
        if duplicate {
            return Err(IntegrationError::InvalidInput(format!(
                "Duplicate key, Product Id: {}, Review Id: {}",
                body.product_id, body.review_id
            )));
        }

        let stored = body.with_service_address(self.service_address.clone());
        state.reviews.push(stored.clone());
        Ok(stored)
    }

    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
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
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn delete_reviews(&self, product_id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        state.calls.delete += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        state.reviews.retain(|r| r.product_id != product_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_list() {
        let service = InMemoryReviewService::with_service_address("rev:1");
        service
            .create_review(Review::new(1, 1, "a", "s", "c"))
            .await
            .unwrap();

        let reviews = service.get_reviews(ProductId::new(1)).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].service_address.as_deref(), Some("rev:1"));
    }

    #[tokio::test]
    async fn delete_removes_only_that_product() {
        let service = InMemoryReviewService::new();
        service
            .create_review(Review::new(1, 1, "a", "s", "c"))
            .await
            .unwrap();
        service
            .create_review(Review::new(2, 1, "a", "s", "c"))
            .await
            .unwrap();

        service.delete_reviews(ProductId::new(1)).await.unwrap();
        assert_eq!(service.review_count().await, 1);
        assert!(service.get_reviews(ProductId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_product_id_is_rejected() {
        let service = InMemoryReviewService::new();
        let err = service.get_reviews(ProductId::new(0)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid productId: 0");
    }
}
