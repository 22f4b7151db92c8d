//! Product service trait and in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::Product;
use tokio::sync::RwLock;

use super::CallCounts;
use crate::error::{IntegrationError, Result};

/// Operations offered by the product service.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Creates a product and returns the stored entity.
    async fn create_product(&self, body: Product) -> Result<Product>;

    /// Looks up a product; a missing product is `NotFound`.
    async fn get_product(&self, product_id: ProductId) -> Result<Product>;

    /// Deletes a product. Deleting a missing product succeeds.
    async fn delete_product(&self, product_id: ProductId) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: Vec<Product>,
    calls: CallCounts,
    unavailable: bool,
}

/// In-memory product service for tests and local runs.
#[derive(Debug, Clone)]
pub struct InMemoryProductService {
    state: Arc<RwLock<InMemoryProductState>>,
    service_address: String,
}

impl Default for InMemoryProductService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductService {
    pub fn new() -> Self {
        Self::with_service_address("in-memory-product")
    }

    /// Creates a service that stamps `address` on every stored product.
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

    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    pub async fn contains(&self, product_id: ProductId) -> bool {
        self.state
            .read()
            .await
            .products
            .iter()
            .any(|p| p.product_id == product_id)
    }
}

fn unavailable() -> IntegrationError {
    IntegrationError::unavailable("in-memory://product", "service unavailable")
}

fn check_id(product_id: ProductId) -> Result<()> {
    if product_id.is_valid() {
        Ok(())
    } else {
        Err(IntegrationError::InvalidInput(format!(
            "Invalid productId: {product_id}"
        )))
    }
}

#[async_trait]
impl ProductService for InMemoryProductService {
    async fn create_product(&self, body: Product) -> Result<Product> {
        let mut state = self.state.write().await;
        state.calls.create += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        check_id(body.product_id)?;

        if state.products.iter().any(|p| p.product_id == body.product_id) {
            return Err(IntegrationError::InvalidInput(format!(
                "Duplicate key, Product Id: {}",
                body.product_id
            )));
        }

        let stored = body.with_service_address(self.service_address.clone());
        state.products.push(stored.clone());
        Ok(stored)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let mut state = self.state.write().await;
        state.calls.get += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        check_id(product_id)?;

        state
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned()
            .ok_or_else(|| {
                IntegrationError::NotFound(format!("No product found for productId: {product_id}"))
            })
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        state.calls.delete += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        state.products.retain(|p| p.product_id != product_id);
        Ok(())
    }
}
