//! HTTP adapters against a mock leaf service.

use std::time::{Duration, Instant};

use common::ProductId;
use domain::{Product, Recommendation, Review};
use integration::{
    BlockingIntegration, DownstreamHealth, HttpTransport, IntegrationError, ProductService,
    ReactiveIntegration, RecommendationService, ReviewService, ServiceUrls,
};
use mockito::{Matcher, Server, ServerGuard};
use tokio::net::TcpListener;

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(2)).unwrap()
}

fn urls(server: &ServerGuard) -> ServiceUrls {
    ServiceUrls::new(server.url(), server.url(), server.url())
}

fn error_body(status: u16, path: &str, message: &str) -> String {
    serde_json::json!({
        "timestamp": "2020-01-01T00:00:00Z",
        "path": path,
        "status": status,
        "error": "",
        "message": message,
    })
    .to_string()
}

#[tokio::test]
async fn blocking_get_product_decodes_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/product/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"productId":1,"name":"name","weight":1,"serviceAddress":"pro:1"}"#)
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let product = integration.get_product(ProductId::new(1)).await.unwrap();

    assert_eq!(product, Product::new(1, "name", 1).with_service_address("pro:1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn blocking_get_product_translates_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/product/13")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(error_body(404, "/product/13", "No product found for productId: 13"))
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let err = integration.get_product(ProductId::new(13)).await.unwrap_err();

    assert!(matches!(err, IntegrationError::NotFound(ref m) if m == "No product found for productId: 13"));
}

#[tokio::test]
async fn blocking_get_product_translates_unprocessable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/product/-1")
        .with_status(422)
        .with_body(error_body(422, "/product/-1", "Invalid productId: -1"))
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let err = integration.get_product(ProductId::new(-1)).await.unwrap_err();

    assert!(matches!(err, IntegrationError::InvalidInput(ref m) if m == "Invalid productId: -1"));
}

#[tokio::test]
async fn blocking_get_product_rethrows_server_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/product/1")
        .with_status(500)
        .with_body("internal failure")
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let err = integration.get_product(ProductId::new(1)).await.unwrap_err();

    match err {
        IntegrationError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal failure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn blocking_lists_degrade_to_empty_on_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/recommendation")
        .match_query(Matcher::UrlEncoded("productId".into(), "1".into()))
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/review")
        .match_query(Matcher::UrlEncoded("productId".into(), "1".into()))
        .with_status(200)
        .with_body("this is not json")
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));

    assert!(integration.get_recommendations(ProductId::new(1)).await.unwrap().is_empty());
    assert!(integration.get_reviews(ProductId::new(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn blocking_lists_degrade_to_empty_when_unreachable() {
    let urls = ServiceUrls::new("http://127.0.0.1:1", "http://127.0.0.1:1", "http://127.0.0.1:1");
    let integration = BlockingIntegration::new(
        HttpTransport::new(Duration::from_millis(300)).unwrap(),
        &urls,
    );

    assert!(integration.get_recommendations(ProductId::new(1)).await.unwrap().is_empty());
    assert!(integration.get_reviews(ProductId::new(1)).await.unwrap().is_empty());
    assert!(matches!(
        integration.get_product(ProductId::new(1)).await,
        Err(IntegrationError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn blocking_lists_preserve_order() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/review")
        .match_query(Matcher::UrlEncoded("productId".into(), "1".into()))
        .with_status(200)
        .with_body(
            serde_json::to_string(&vec![
                Review::new(1, 3, "a", "s", "c"),
                Review::new(1, 1, "a", "s", "c"),
            ])
            .unwrap(),
        )
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let ids: Vec<_> = integration
        .get_reviews(ProductId::new(1))
        .await
        .unwrap()
        .iter()
        .map(|r| r.review_id)
        .collect();

    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn blocking_writes_post_and_delete() {
    let mut server = Server::new_async().await;
    let recommendation = Recommendation::new(1, 1, "a", 1, "c");
    let create = server
        .mock("POST", "/recommendation")
        .match_body(Matcher::PartialJsonString(
            r#"{"productId":1,"recommendationId":1}"#.to_string(),
        ))
        .with_status(200)
        .with_body(serde_json::to_string(&recommendation).unwrap())
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/recommendation")
        .match_query(Matcher::UrlEncoded("productId".into(), "1".into()))
        .with_status(200)
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let created = integration
        .create_recommendation(recommendation.clone())
        .await
        .unwrap();
    integration
        .delete_recommendations(ProductId::new(1))
        .await
        .unwrap();

    assert_eq!(created, recommendation);
    create.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn blocking_delete_reviews_is_issued() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/review")
        .match_query(Matcher::UrlEncoded("productId".into(), "7".into()))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    integration.delete_reviews(ProductId::new(7)).await.unwrap();
    integration.delete_reviews(ProductId::new(7)).await.unwrap();

    delete.assert_async().await;
}

#[tokio::test]
async fn blocking_create_propagates_invalid_input() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/product")
        .with_status(422)
        .with_body(error_body(422, "/product", "Duplicate key, Product Id: 1"))
        .create_async()
        .await;

    let integration = BlockingIntegration::new(transport(), &urls(&server));
    let err = integration
        .create_product(Product::new(1, "name", 1))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Duplicate key, Product Id: 1");
}

#[tokio::test]
async fn reactive_uses_reactive_endpoints_and_propagates_list_failures() {
    let mut server = Server::new_async().await;
    let product = server
        .mock("GET", "/reactive/product/1")
        .with_status(200)
        .with_body(r#"{"productId":1,"name":"name","weight":1}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/reactive/recommendation")
        .match_query(Matcher::UrlEncoded("productId".into(), "1".into()))
        .with_status(503)
        .create_async()
        .await;

    let integration = ReactiveIntegration::new(transport(), &urls(&server));

    let found = integration.get_product(ProductId::new(1)).await.unwrap();
    assert_eq!(found.name, "name");
    product.assert_async().await;

    let err = integration
        .get_recommendations(ProductId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, IntegrationError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn health_reports_each_service() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/actuator/health")
        .with_status(200)
        .with_body(r#"{"status":"UP"}"#)
        .create_async()
        .await;

    let up = ServiceUrls::new(server.url(), server.url(), "http://127.0.0.1:1");
    let integration = ReactiveIntegration::new(
        HttpTransport::new(Duration::from_millis(500)).unwrap(),
        &up,
    );
    let health = integration.health().await;

    assert!(health["product"].is_up());
    assert!(health["recommendation"].is_up());
    assert!(!health["review"].is_up());
}

/// Accepts connections and never answers them.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("http://{address}")
}

#[tokio::test]
async fn blocking_timeouts_fail_product_and_empty_lists() {
    let url = silent_server().await;
    let integration = BlockingIntegration::new(
        HttpTransport::new(Duration::from_millis(200)).unwrap(),
        &ServiceUrls::new(&url, &url, &url),
    );
    let start = Instant::now();

    assert!(integration.get_recommendations(ProductId::new(1)).await.unwrap().is_empty());
    assert!(integration.get_reviews(ProductId::new(1)).await.unwrap().is_empty());
    assert!(matches!(
        integration.get_product(ProductId::new(1)).await,
        Err(IntegrationError::Unavailable { .. })
    ));

    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn reactive_timeouts_are_returned() {
    let url = silent_server().await;
    let integration = ReactiveIntegration::new(
        HttpTransport::new(Duration::from_millis(200)).unwrap(),
        &ServiceUrls::new(&url, &url, &url),
    );
    let start = Instant::now();

    assert!(matches!(
        integration.get_reviews(ProductId::new(1)).await,
        Err(IntegrationError::Unavailable { .. })
    ));
    assert!(matches!(
        integration.get_product(ProductId::new(1)).await,
        Err(IntegrationError::Unavailable { .. })
    ));

    assert!(start.elapsed() < Duration::from_secs(2));
}
