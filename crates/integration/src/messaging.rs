//! Event-publishing integration: writes become events, reads stay HTTP.

use std::collections::BTreeMap;

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, Recommendation, Review};
use events::{Event, MessageSources, publish};

use crate::error::Result;
use crate::health::{DownstreamHealth, HealthStatus};
use crate::reactive::ReactiveIntegration;
use crate::services::{ProductService, RecommendationService, ReviewService};

/// Publishes creates and deletes on the per-entity channels.
///
/// A write returns as soon as the channel accepted the event; nothing is
/// known about whether the leaf service applied it. Creates echo the input
/// entity back. Reads are delegated to the reactive HTTP endpoints.
#[derive(Debug, Clone)]
pub struct EventIntegration {
    reads: ReactiveIntegration,
    sources: MessageSources,
}

impl EventIntegration {
    pub fn new(reads: ReactiveIntegration, sources: MessageSources) -> Self {
        Self { reads, sources }
    }

    pub fn sources(&self) -> &MessageSources {
        &self.sources
    }
}

#[async_trait]
impl ProductService for EventIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_product(&self, body: Product) -> Result<Product> {
        publish(
            self.sources.products.as_ref(),
            &Event::create(body.product_id, &body),
        )?;
        Ok(body)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        self.reads.get_product(product_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        publish(
            self.sources.products.as_ref(),
            &Event::<ProductId, Product>::delete(product_id),
        )?;
        Ok(())
    }
}

#[async_trait]
impl RecommendationService for EventIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_recommendation(&self, body: Recommendation) -> Result<Recommendation> {
        publish(
            self.sources.recommendations.as_ref(),
            &Event::create(body.product_id, &body),
        )?;
        Ok(body)
    }

    async fn get_recommendations(&self, product_id: ProductId) -> Result<Vec<Recommendation>> {
        self.reads.get_recommendations(product_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_recommendations(&self, product_id: ProductId) -> Result<()> {
        publish(
            self.sources.recommendations.as_ref(),
            &Event::<ProductId, Recommendation>::delete(product_id),
        )?;
        Ok(())
    }
}

#[async_trait]
impl ReviewService for EventIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_review(&self, body: Review) -> Result<Review> {
        publish(
            self.sources.reviews.as_ref(),
            &Event::create(body.product_id, &body),
        )?;
        Ok(body)
    }

    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        self.reads.get_reviews(product_id).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_reviews(&self, product_id: ProductId) -> Result<()> {
        publish(
            self.sources.reviews.as_ref(),
            &Event::<ProductId, Review>::delete(product_id),
        )?;
        Ok(())
    }
}

#[async_trait]
impl DownstreamHealth for EventIntegration {
    async fn health(&self) -> BTreeMap<String, HealthStatus> {
        self.reads.health().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use events::{EventType, is_same_event};

    use super::*;
    use crate::http::{HttpTransport, ServiceUrls};

    fn integration() -> (EventIntegration, events::MessageSinks) {
        let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
        let urls = ServiceUrls::new("http://127.0.0.1:1", "http://127.0.0.1:1", "http://127.0.0.1:1");
        let (sources, sinks) = MessageSources::bounded(16).unwrap();
        (
            EventIntegration::new(ReactiveIntegration::new(transport, &urls), sources),
            sinks,
        )
    }

    #[tokio::test]
    async fn create_product_publishes_one_create_event() {
        let (integration, mut sinks) = integration();
        let product = Product::new(1, "name", 1);

        let echoed = integration.create_product(product.clone()).await.unwrap();
        assert_eq!(echoed, product);

        let payload = sinks.products.try_recv().unwrap();
        assert!(is_same_event(&payload, &Event::create(ProductId::new(1), product)));
        assert!(sinks.products.try_recv().is_err());
        assert!(sinks.recommendations.try_recv().is_err());
        assert!(sinks.reviews.try_recv().is_err());
    }

    #[tokio::test]
    async fn deletes_publish_keyed_events_without_data() {
        let (integration, mut sinks) = integration();
        let id = ProductId::new(1);

        integration.delete_product(id).await.unwrap();
        integration.delete_recommendations(id).await.unwrap();
        integration.delete_reviews(id).await.unwrap();

        for rx in [&mut sinks.products, &mut sinks.recommendations, &mut sinks.reviews] {
            let payload = rx.try_recv().unwrap();
            let event: Event<ProductId, serde_json::Value> = serde_json::from_str(&payload).unwrap();
            assert_eq!(event.event_type(), EventType::Delete);
            assert_eq!(*event.key(), id);
            assert!(event.data().is_none());
        }
    }

    #[tokio::test]
    async fn closed_channel_surfaces_as_publish_error() {
        let (integration, sinks) = integration();
        drop(sinks);

        let err = integration
            .create_review(Review::new(1, 1, "a", "s", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::IntegrationError::Publish(_)));
    }
}
