use common::ProductId;
use serde::{Deserialize, Serialize};

/// A recommendation, keyed by `(product_id, recommendation_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: ProductId,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
    #[serde(default)]
    pub service_address: Option<String>,
}

impl Recommendation {
    /// Creates a recommendation without a service address.
    pub fn new(
        product_id: impl Into<ProductId>,
        recommendation_id: i32,
        author: impl Into<String>,
        rate: i32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            recommendation_id,
            author: author.into(),
            rate,
            content: content.into(),
            service_address: None,
        }
    }

    /// Sets the address of the instance that served this recommendation.
    pub fn with_service_address(mut self, address: impl Into<String>) -> Self {
        self.service_address = Some(address.into());
        self
    }
}
