use common::ProductId;
use serde::{Deserialize, Serialize};

/// A review, keyed by `(product_id, review_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub product_id: ProductId,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub service_address: Option<String>,
}

impl Review {
    /// Creates a review without a service address.
    pub fn new(
        product_id: impl Into<ProductId>,
        review_id: i32,
        author: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            review_id,
            author: author.into(),
            subject: subject.into(),
            content: content.into(),
            service_address: None,
        }
    }

    /// Sets the address of the instance that served this review.
    pub fn with_service_address(mut self, address: impl Into<String>) -> Self {
        self.service_address = Some(address.into());
        self
    }
}
