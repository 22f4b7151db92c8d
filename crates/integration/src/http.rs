//! HTTP transport shared by the request/response and reactive adapters.

use std::time::Duration;

use common::ProductId;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{IntegrationError, Result};
use crate::health::HealthStatus;
use crate::translator::translate;

/// Base URLs of the three leaf services, e.g. `http://product:7001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub product: String,
    pub recommendation: String,
    pub review: String,
}

impl ServiceUrls {
    pub fn new(
        product: impl Into<String>,
        recommendation: impl Into<String>,
        review: impl Into<String>,
    ) -> Self {
        Self {
            product: trim(product.into()),
            recommendation: trim(recommendation.into()),
            review: trim(review.into()),
        }
    }
}

fn trim(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Resource URLs for one family of leaf endpoints.
///
/// Request/response endpoints live at the root (`/product/{id}`), the
/// reactive ones under `/reactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    product: String,
    recommendation: String,
    review: String,
    health: ServiceUrls,
}

impl Endpoints {
    /// Endpoints served by the request/response controllers.
    pub fn request_response(urls: &ServiceUrls) -> Self {
        Self::with_prefix(urls, "")
    }

    /// Endpoints served by the reactive controllers.
    pub fn reactive(urls: &ServiceUrls) -> Self {
        Self::with_prefix(urls, "/reactive")
    }

    fn with_prefix(urls: &ServiceUrls, prefix: &str) -> Self {
        Self {
            product: format!("{}{prefix}/product", urls.product),
            recommendation: format!("{}{prefix}/recommendation", urls.recommendation),
            review: format!("{}{prefix}/review", urls.review),
            health: urls.clone(),
        }
    }

    pub fn products(&self) -> &str {
        &self.product
    }

    pub fn product(&self, product_id: ProductId) -> String {
        format!("{}/{product_id}", self.product)
    }

    pub fn recommendations(&self) -> &str {
        &self.recommendation
    }

    pub fn recommendations_for(&self, product_id: ProductId) -> String {
        format!("{}?productId={product_id}", self.recommendation)
    }

    pub fn reviews(&self) -> &str {
        &self.review
    }

    pub fn reviews_for(&self, product_id: ProductId) -> String {
        format!("{}?productId={product_id}", self.review)
    }

    /// Health endpoints of the three services, in product, recommendation,
    /// review order.
    pub fn health(&self) -> [(&'static str, String); 3] {
        [
            ("product", format!("{}/actuator/health", self.health.product)),
            (
                "recommendation",
                format!("{}/actuator/health", self.health.recommendation),
            ),
            ("review", format!("{}/actuator/health", self.health.review)),
        ]
    }
}

/// JSON-over-HTTP calls with a fixed timeout.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose every request times out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    /// `GET url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        let response = check(response).await?;
        response.json().await.map_err(|e| transport_error(url, e))
    }

    /// `POST url` with a JSON body and decode the echoed entity.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        let response = check(response).await?;
        response.json().await.map_err(|e| transport_error(url, e))
    }

    /// `DELETE url`, ignoring any response body.
    pub async fn delete(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;
        check(response).await?;
        Ok(())
    }

    /// `GET url` and report whether it answered with a 2xx status.
    pub async fn probe(&self, url: &str) -> HealthStatus {
        tracing::info!(url, "calling health endpoint");
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Up,
            Ok(response) => HealthStatus::down(format!("status {}", response.status())),
            Err(e) => HealthStatus::down(e.to_string()),
        }
    }
}

/// Passes 2xx responses through and translates everything else.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = match response.error_for_status_ref() {
        Err(e) => e.to_string(),
        Ok(_) => status.to_string(),
    };
    let body = response.text().await.unwrap_or_default();
    Err(translate(status, &body, &fallback))
}

fn transport_error(url: &str, e: reqwest::Error) -> IntegrationError {
    if e.is_decode() {
        IntegrationError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else {
        IntegrationError::unavailable(url, e.to_string())
    }
}

/// Counts a call to a leaf service.
pub(crate) fn record_call(service: &'static str, operation: &'static str) {
    metrics::counter!("downstream_calls_total", "service" => service, "operation" => operation)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> ServiceUrls {
        ServiceUrls::new("http://p:1/", "http://rec:2", "http://rev:3")
    }

    #[test]
    fn request_response_endpoints() {
        let endpoints = Endpoints::request_response(&urls());
        assert_eq!(endpoints.products(), "http://p:1/product");
        assert_eq!(endpoints.product(ProductId::new(5)), "http://p:1/product/5");
        assert_eq!(
            endpoints.recommendations_for(ProductId::new(5)),
            "http://rec:2/recommendation?productId=5"
        );
        assert_eq!(
            endpoints.reviews_for(ProductId::new(5)),
            "http://rev:3/review?productId=5"
        );
    }

    #[test]
    fn reactive_endpoints_are_prefixed() {
        let endpoints = Endpoints::reactive(&urls());
        assert_eq!(endpoints.product(ProductId::new(1)), "http://p:1/reactive/product/1");
        assert_eq!(endpoints.recommendations(), "http://rec:2/reactive/recommendation");
        assert_eq!(endpoints.reviews(), "http://rev:3/reactive/review");
    }

    #[test]
    fn health_endpoints_ignore_prefix() {
        let endpoints = Endpoints::reactive(&urls());
        let health = endpoints.health();
        assert_eq!(health[0], ("product", "http://p:1/actuator/health".to_string()));
        assert_eq!(health[2].0, "review");
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        let transport = HttpTransport::new(Duration::from_millis(500)).unwrap();
        let err = transport
            .get_json::<serde_json::Value>("http://127.0.0.1:1/product/1")
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Unavailable { .. }));
    }
}
