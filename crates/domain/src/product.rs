use common::ProductId;
use serde::{Deserialize, Serialize};

/// A product as stored by the product service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub weight: i32,
    /// Address of the instance that served this entity. Informational only.
    #[serde(default)]
    pub service_address: Option<String>,
}

impl Product {
    /// Creates a product without a service address.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, weight: i32) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            weight,
            service_address: None,
        }
    }

    /// Sets the address of the instance that served this product.
    pub fn with_service_address(mut self, address: impl Into<String>) -> Self {
        self.service_address = Some(address.into());
        self
    }
}
