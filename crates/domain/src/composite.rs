//! The product aggregate returned by the composite service.

use common::ProductId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::{Product, Recommendation, Review};

/// Recommendation as embedded in a [`ProductAggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSummary {
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}

impl RecommendationSummary {
    pub fn new(
        recommendation_id: i32,
        author: impl Into<String>,
        rate: i32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            recommendation_id,
            author: author.into(),
            rate,
            content: content.into(),
        }
    }

    /// Expands the summary into the entity stored by the recommendation service.
    pub fn to_recommendation(&self, product_id: ProductId) -> Recommendation {
        Recommendation::new(
            product_id,
            self.recommendation_id,
            self.author.clone(),
            self.rate,
            self.content.clone(),
        )
    }
}

impl From<&Recommendation> for RecommendationSummary {
    fn from(r: &Recommendation) -> Self {
        Self::new(r.recommendation_id, r.author.clone(), r.rate, r.content.clone())
    }
}

/// Review as embedded in a [`ProductAggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

impl ReviewSummary {
    pub fn new(
        review_id: i32,
        author: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            review_id,
            author: author.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }

    /// Expands the summary into the entity stored by the review service.
    pub fn to_review(&self, product_id: ProductId) -> Review {
        Review::new(
            product_id,
            self.review_id,
            self.author.clone(),
            self.subject.clone(),
            self.content.clone(),
        )
    }
}

impl From<&Review> for ReviewSummary {
    fn from(r: &Review) -> Self {
        Self::new(
            r.review_id,
            r.author.clone(),
            r.subject.clone(),
            r.content.clone(),
        )
    }
}

/// Which instance served each part of an aggregate.
///
/// An address is empty when the corresponding part was empty or the
/// service did not report one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAddresses {
    #[serde(rename = "cmp")]
    pub composite: String,
    #[serde(rename = "pro")]
    pub product: String,
    #[serde(rename = "rev")]
    pub review: String,
    #[serde(rename = "rec")]
    pub recommendation: String,
}

/// A product together with its recommendations and reviews.
///
/// Never persisted: built on every read from the three leaf services, and
/// fanned out into entity writes on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAggregate {
    pub product_id: ProductId,
    pub name: String,
    pub weight: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommendations: Vec<RecommendationSummary>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reviews: Vec<ReviewSummary>,
    #[serde(default)]
    pub service_addresses: Option<ServiceAddresses>,
}

impl ProductAggregate {
    /// Creates an aggregate with no recommendations or reviews.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, weight: i32) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            weight,
            recommendations: Vec::new(),
            reviews: Vec::new(),
            service_addresses: None,
        }
    }

    pub fn with_recommendations(mut self, recommendations: Vec<RecommendationSummary>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_reviews(mut self, reviews: Vec<ReviewSummary>) -> Self {
        self.reviews = reviews;
        self
    }

    /// Composes an aggregate from what the leaf services returned.
    ///
    /// Summaries keep the order in which the entities arrived. The
    /// recommendation and review addresses are taken from the first entry
    /// of each sequence.
    pub fn assemble(
        product: Product,
        recommendations: &[Recommendation],
        reviews: &[Review],
        composite_address: impl Into<String>,
    ) -> Self {
        let first_address = |address: Option<&Option<String>>| {
            address.and_then(|a| a.clone()).unwrap_or_default()
        };

        let service_addresses = ServiceAddresses {
            composite: composite_address.into(),
            product: product.service_address.clone().unwrap_or_default(),
            review: first_address(reviews.first().map(|r| &r.service_address)),
            recommendation: first_address(recommendations.first().map(|r| &r.service_address)),
        };

        Self {
            product_id: product.product_id,
            name: product.name,
            weight: product.weight,
            recommendations: recommendations.iter().map(RecommendationSummary::from).collect(),
            reviews: reviews.iter().map(ReviewSummary::from).collect(),
            service_addresses: Some(service_addresses),
        }
    }

    /// Checks the fields every leaf service requires.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.product_id.is_valid() {
            return Err(ValidationError::InvalidProductId(self.product_id));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        Ok(())
    }

    /// The product entity described by this aggregate.
    pub fn product(&self) -> Product {
        Product::new(self.product_id, self.name.clone(), self.weight)
    }

    /// Recommendation entities, each keyed to this aggregate's product.
    pub fn recommendation_entities(&self) -> impl Iterator<Item = Recommendation> + '_ {
        self.recommendations
            .iter()
            .map(|r| r.to_recommendation(self.product_id))
    }

    /// Review entities, each keyed to this aggregate's product.
    pub fn review_entities(&self) -> impl Iterator<Item = Review> + '_ {
        self.reviews.iter().map(|r| r.to_review(self.product_id))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
