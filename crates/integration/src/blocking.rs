//! Request/response integration with the leaf services.

use std::collections::BTreeMap;

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, Recommendation, Review};

use crate::error::Result;
use crate::health::{DownstreamHealth, HealthStatus};
use crate::http::{Endpoints, HttpTransport, ServiceUrls, record_call};
use crate::services::{ProductService, RecommendationService, ReviewService};

/// Calls the request/response endpoints of the leaf services.
///
/// Every call completes, fails or times out before it returns. Recommendation
/// and review lookups never fail: any error is logged and an empty list is
/// returned, so an aggregate can still be built when those services are down.
#[derive(Debug, Clone)]
pub struct BlockingIntegration {
    transport: HttpTransport,
    endpoints: Endpoints,
}

impl BlockingIntegration {
    pub fn new(transport: HttpTransport, urls: &ServiceUrls) -> Self {
        Self {
            transport,
            endpoints: Endpoints::request_response(urls),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl ProductService for BlockingIntegration {
    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_product(&self, body: Product) -> Result<Product> {
        record_call("product", "create");
        let url = self.endpoints.products();
        tracing::debug!(url, "will post a new product");
        let product: Product = self.transport.post_json(url, &body).await?;
        tracing::debug!(product_id = %product.product_id, "created product");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        record_call("product", "get");
        let url = self.endpoints.product(product_id);
        tracing::debug!(%url, "will call getProduct");
        let product: Product = self.transport.get_json(&url).await?;
        tracing::debug!(product_id = %product.product_id, "found a product");
        Ok(product)
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
impl RecommendationService for BlockingIntegration {
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

        match self.transport.get_json::<Vec<Recommendation>>(&url).await {
            Ok(recommendations) => {
                tracing::debug!(count = recommendations.len(), "found recommendations");
                Ok(recommendations)
            }
            Err(e) => {
                metrics::counter!("downstream_absorbed_failures_total", "service" => "recommendation")
                    .increment(1);
                tracing::warn!(error = %e, "got an exception while requesting recommendations, return zero recommendations");
                Ok(Vec::new())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_recommendations(&self, product_id: ProductId) -> Result<()> {
        record_call("recommendation", "delete");
        let url = self.endpoints.recommendations_for(product_id);
        tracing::debug!(%url, "will call delete recommendations");
        self.transport.delete(&url).await
    }
}

#[async_trait]
impl ReviewService for BlockingIntegration {
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

        match self.transport.get_json::<Vec<Review>>(&url).await {
            Ok(reviews) => {
                tracing::debug!(count = reviews.len(), "found reviews");
                Ok(reviews)
            }
            Err(e) => {
                metrics::counter!("downstream_absorbed_failures_total", "service" => "review")
                    .increment(1);
                tracing::warn!(error = %e, "got an exception while requesting reviews, return zero reviews");
                Ok(Vec::new())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_reviews(&self, product_id: ProductId) -> Result<()> {
        record_call("review", "delete");
        let url = self.endpoints.reviews_for(product_id);
        tracing::debug!(%url, "will call delete reviews");
        self.transport.delete(&url).await
    }
}

#[async_trait]
impl DownstreamHealth for BlockingIntegration {
    async fn health(&self) -> BTreeMap<String, HealthStatus> {
        probe_all(&self.transport, &self.endpoints).await
    }
}

/// Probes the three services concurrently.
pub(crate) async fn probe_all(
    transport: &HttpTransport,
    endpoints: &Endpoints,
) -> BTreeMap<String, HealthStatus> {
    let [(p_name, p_url), (rec_name, rec_url), (rev_name, rev_url)] = endpoints.health();
    let (product, recommendation, review) = tokio::join!(
        transport.probe(&p_url),
        transport.probe(&rec_url),
        transport.probe(&rev_url),
    );

    BTreeMap::from([
        (p_name.to_string(), product),
        (rec_name.to_string(), recommendation),
        (rev_name.to_string(), review),
    ])
}
