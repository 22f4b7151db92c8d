//! Event handlers that apply published events to a leaf service.
//!
//! These sit on the consuming end of the per-entity channels: CREATE events
//! create the carried entity, DELETE events delete by key.

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, Recommendation, Review};
use events::{Event, EventHandler, EventType, ProcessingError};

use crate::services::{ProductService, RecommendationService, ReviewService};

fn missing_data(event_type: EventType, key: ProductId) -> ProcessingError {
    ProcessingError::MissingData {
        event_type: event_type.to_string(),
        key: key.to_string(),
    }
}

fn handler_failed(e: crate::IntegrationError) -> ProcessingError {
    ProcessingError::Handler(e.to_string())
}

/// Applies product events to a [`ProductService`].
#[derive(Debug, Clone)]
pub struct ProductEventRelay<S> {
    service: S,
}

impl<S: ProductService> ProductEventRelay<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: ProductService> EventHandler for ProductEventRelay<S> {
    type Key = ProductId;
    type Data = Product;

    async fn handle(&self, event: Event<ProductId, Product>) -> Result<(), ProcessingError> {
        let (event_type, key, data) = event.into_parts();
        match event_type {
            EventType::Create => {
                let product = data.ok_or_else(|| missing_data(event_type, key))?;
                tracing::info!(product_id = %product.product_id, "create product");
                self.service
                    .create_product(product)
                    .await
                    .map_err(handler_failed)?;
            }
            EventType::Delete => {
                tracing::info!(product_id = %key, "delete product");
                self.service.delete_product(key).await.map_err(handler_failed)?;
            }
        }
        Ok(())
    }
}

/// Applies recommendation events to a [`RecommendationService`].
#[derive(Debug, Clone)]
pub struct RecommendationEventRelay<S> {
    service: S,
}

impl<S: RecommendationService> RecommendationEventRelay<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: RecommendationService> EventHandler for RecommendationEventRelay<S> {
    type Key = ProductId;
    type Data = Recommendation;

    async fn handle(
        &self,
        event: Event<ProductId, Recommendation>,
    ) -> Result<(), ProcessingError> {
        let (event_type, key, data) = event.into_parts();
        match event_type {
            EventType::Create => {
                let recommendation = data.ok_or_else(|| missing_data(event_type, key))?;
                self.service
                    .create_recommendation(recommendation)
                    .await
                    .map_err(handler_failed)?;
            }
            EventType::Delete => {
                self.service
                    .delete_recommendations(key)
                    .await
                    .map_err(handler_failed)?;
            }
        }
        Ok(())
    }
}

/// Applies review events to a [`ReviewService`].
#[derive(Debug, Clone)]
pub struct ReviewEventRelay<S> {
    service: S,
}

impl<S: ReviewService> ReviewEventRelay<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: ReviewService> EventHandler for ReviewEventRelay<S> {
    type Key = ProductId;
    type Data = Review;

    async fn handle(&self, event: Event<ProductId, Review>) -> Result<(), ProcessingError> {
        let (event_type, key, data) = event.into_parts();
        match event_type {
            EventType::Create => {
                let review = data.ok_or_else(|| missing_data(event_type, key))?;
                self.service.create_review(review).await.map_err(handler_failed)?;
            }
            EventType::Delete => {
                self.service.delete_reviews(key).await.map_err(handler_failed)?;
            }
        }
        Ok(())
    }
}
