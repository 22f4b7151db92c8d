//! Non-blocking integration against the reactive leaf endpoints.

use std::collections::BTreeMap;

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, Recommendation, Review};

use crate::blocking::probe_all;
use crate::error::Result;
use crate::health::{DownstreamHealth, HealthStatus};
use crate::http::{Endpoints, HttpTransport, ServiceUrls, record_call};
use crate::services::{ProductService, RecommendationService, ReviewService};

/// Calls the `/reactive` endpoints of the leaf services.
///
/// The returned futures do nothing until polled, so a caller can start the
/// three reads of an aggregate together and join them. Unlike
/// [`BlockingIntegration`](crate::BlockingIntegration) every failure is
/// returned to the caller, which decides what a failed list means.
#[derive(Debug, Clone)]
pub struct ReactiveIntegration {
    transport: HttpTransport,
    endpoints: Endpoints,
}

impl ReactiveIntegration {
    pub fn new(transport: HttpTransport, urls: &ServiceUrls) -> Self {
        Self {
            transport,
            endpoints: Endpoints::reactive(urls),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl ProductService for ReactiveIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_product(&self, body: Product) -> Result<Product> {
        record_call("product", "create");
        tracing::debug!(url = self.endpoints.products(), "will post a new product");
        self.transport.post_json(self.endpoints.products(), &body).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        record_call("product", "get");
        let url = self.endpoints.product(product_id);
        tracing::debug!(%url, "will call getProduct");
        self.transport.get_json(&url).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        record_call("product", "delete");
        let url = self.endpoints.product(product_id);
        tracing::debug!(%url, "will call delete");
        self.transport.delete(&url).await
    }
}

#[async_trait]
impl RecommendationService for ReactiveIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_recommendation(&self, body: Recommendation) -> Result<Recommendation> {
        record_call("recommendation", "create");
        self.transport
            .post_json(self.endpoints.recommendations(), &body)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_recommendations(&self, product_id: ProductId) -> Result<Vec<Recommendation>> {
        record_call("recommendation", "list");
        let url = self.endpoints.recommendations_for(product_id);
        tracing::debug!(%url, "will call getRecommendations");
        self.transport.get_json(&url).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_recommendations(&self, product_id: ProductId) -> Result<()> {
        record_call("recommendation", "delete");
        let url = self.endpoints.recommendations_for(product_id);
        self.transport.delete(&url).await
    }
}

#[async_trait]
impl ReviewService for ReactiveIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_review(&self, body: Review) -> Result<Review> {
        record_call("review", "create");
        self.transport.post_json(self.endpoints.reviews(), &body).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        record_call("review", "list");
        let url = self.endpoints.reviews_for(product_id);
        tracing::debug!(%url, "will call getReviews");
        self.transport.get_json(&url).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_reviews(&self, product_id: ProductId) -> Result<()> {
        record_call("review", "delete");
        let url = self.endpoints.reviews_for(product_id);
        self.transport.delete(&url).await
    }
}

#[async_trait]
impl DownstreamHealth for ReactiveIntegration {
    async fn health(&self) -> BTreeMap<String, HealthStatus> {
        probe_all(&self.transport, &self.endpoints).await
    }
}
