//! Read, create and delete state machines for product aggregates.

use std::time::Instant;

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, ProductAggregate, Recommendation, Review};
use integration::{IntegrationError, ProductService, RecommendationService, ReviewService};

use crate::error::Result;

/// How the secondary lookups of a read are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Product, then recommendations, then reviews, one after the other.
    /// Nothing else is called when the product lookup fails.
    #[default]
    Sequential,
    /// All three lookups in flight together; a failed product lookup
    /// fails the read without waiting for the other two.
    Concurrent,
}

/// Operations on product aggregates, as served by the composite API.
#[async_trait]
pub trait ProductCompositeService: Send + Sync {
    /// Builds the aggregate for `product_id`.
    ///
    /// Fails only when the product itself cannot be read. Failed
    /// recommendation or review lookups yield empty lists.
    async fn get_composite_product(&self, product_id: ProductId) -> Result<ProductAggregate>;

    /// Writes the product, then each recommendation, then each review.
    ///
    /// Stops at the first failure. Entities already written stay written.
    async fn create_composite_product(&self, body: ProductAggregate) -> Result<()>;

    /// Deletes the product and everything keyed to it.
    ///
    /// All three deletes are attempted; the first failure is returned.
    async fn delete_composite_product(&self, product_id: ProductId) -> Result<()>;
}

type Parts = (Product, Vec<Recommendation>, Vec<Review>);

/// Aggregator over a product, a recommendation and a review service.
///
/// Holds no state besides its collaborators and can be shared freely
/// between requests.
#[derive(Debug, Clone)]
pub struct CompositeService<P, R, V>
where
    P: ProductService,
    R: RecommendationService,
    V: ReviewService,
{
    products: P,
    recommendations: R,
    reviews: V,
    service_address: String,
    read_mode: ReadMode,
}

impl<P, R, V> CompositeService<P, R, V>
where
    P: ProductService,
    R: RecommendationService,
    V: ReviewService,
{
    /// Creates an aggregator. `service_address` is reported as the
    /// composite's address in every aggregate it builds.
    pub fn new(
        products: P,
        recommendations: R,
        reviews: V,
        service_address: impl Into<String>,
        read_mode: ReadMode,
    ) -> Self {
        Self {
            products,
            recommendations,
            reviews,
            service_address: service_address.into(),
            read_mode,
        }
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    async fn read_sequential(&self, product_id: ProductId) -> integration::Result<Parts> {
        let product = self.products.get_product(product_id).await?;
        let recommendations = absorb(
            "recommendation",
            self.recommendations.get_recommendations(product_id).await,
        );
        let reviews = absorb("review", self.reviews.get_reviews(product_id).await);
        Ok((product, recommendations, reviews))
    }

    async fn read_concurrent(&self, product_id: ProductId) -> integration::Result<Parts> {
        tokio::try_join!(
            self.products.get_product(product_id),
            async {
                Ok::<_, IntegrationError>(absorb(
                    "recommendation",
                    self.recommendations.get_recommendations(product_id).await,
                ))
            },
            async {
                Ok::<_, IntegrationError>(absorb(
                    "review",
                    self.reviews.get_reviews(product_id).await,
                ))
            },
        )
    }

    async fn write_entities(&self, body: &ProductAggregate) -> integration::Result<()> {
        self.products.create_product(body.product()).await?;

        for recommendation in body.recommendation_entities() {
            self.recommendations
                .create_recommendation(recommendation)
                .await?;
        }

        for review in body.review_entities() {
            self.reviews.create_review(review).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl<P, R, V> ProductCompositeService for CompositeService<P, R, V>
where
    P: ProductService,
    R: RecommendationService,
    V: ReviewService,
{
    #[tracing::instrument(skip(self), fields(read_mode = ?self.read_mode))]
    async fn get_composite_product(&self, product_id: ProductId) -> Result<ProductAggregate> {
        metrics::counter!("composite_reads_total").increment(1);
        let start = Instant::now();
        tracing::debug!("will get composite product info");

        let parts = match self.read_mode {
            ReadMode::Sequential => self.read_sequential(product_id).await,
            ReadMode::Concurrent => self.read_concurrent(product_id).await,
        };
        metrics::histogram!("composite_read_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        let (product, recommendations, reviews) = parts.inspect_err(|e| {
            tracing::debug!(error = %e, "product lookup failed");
            record_failure("read");
        })?;

        let aggregate =
            ProductAggregate::assemble(product, &recommendations, &reviews, &self.service_address);
        tracing::debug!(
            recommendations = aggregate.recommendations.len(),
            reviews = aggregate.reviews.len(),
            "composed product aggregate"
        );
        Ok(aggregate)
    }

    #[tracing::instrument(skip(self, body), fields(product_id = %body.product_id))]
    async fn create_composite_product(&self, body: ProductAggregate) -> Result<()> {
        metrics::counter!("composite_writes_total").increment(1);

        body.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "rejected composite product");
            record_failure("create");
        })?;

        tracing::debug!(
            recommendations = body.recommendations.len(),
            reviews = body.reviews.len(),
            "will create a new composite entity"
        );
        self.write_entities(&body).await.inspect_err(|e| {
            tracing::warn!(error = %e, "createCompositeProduct failed");
            record_failure("create");
        })?;

        tracing::debug!("created composite entity");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_composite_product(&self, product_id: ProductId) -> Result<()> {
        metrics::counter!("composite_deletes_total").increment(1);
        tracing::debug!("will delete a product aggregate");

        let outcomes = [
            ("product", self.products.delete_product(product_id).await),
            (
                "recommendation",
                self.recommendations.delete_recommendations(product_id).await,
            ),
            ("review", self.reviews.delete_reviews(product_id).await),
        ];

        let mut first_error = None;
        for (service, outcome) in outcomes {
            if let Err(e) = outcome {
                tracing::warn!(service, error = %e, "delete failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => {
                record_failure("delete");
                Err(e.into())
            }
            None => {
                tracing::debug!("deleted product aggregate");
                Ok(())
            }
        }
    }
}

/// Turns a failed list lookup into an empty list.
fn absorb<T>(service: &'static str, result: integration::Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(service, error = %e, "lookup failed, continuing without it");
        metrics::counter!("downstream_absorbed_failures_total", "service" => service).increment(1);
        Vec::new()
    })
}

fn record_failure(operation: &'static str) {
    metrics::counter!("composite_failures_total", "operation" => operation).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_keeps_successful_lists() {
        assert_eq!(absorb("review", Ok(vec![1, 2, 3])), vec![1, 2, 3]);
    }

    #[test]
    fn absorb_replaces_failures_with_empty_list() {
        let failed: integration::Result<Vec<i32>> =
            Err(IntegrationError::unavailable("http://review", "connection refused"));
        assert!(absorb("review", failed).is_empty());
    }

    #[test]
    fn sequential_is_default() {
        assert_eq!(ReadMode::default(), ReadMode::Sequential);
    }
}
