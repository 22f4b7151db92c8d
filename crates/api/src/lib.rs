//! HTTP API for the product composite service.
//!
//! Serves the aggregate endpoints under `/composite`, health checks and
//! Prometheus metrics, and wires the composite to the leaf services in the
//! transport mode selected by [`Config`].

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use composite::{CompositeService, ReadMode};
use events::{EventProcessor, MessageSources, ProcessorStats};
use integration::{
    BlockingIntegration, EventIntegration, HttpTransport, IntegrationError, ProductEventRelay,
    ReactiveIntegration, RecommendationEventRelay, ReviewEventRelay,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{Config, TransportMode};
pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/health/downstream", get(routes::health::downstream))
        .route("/composite", axum::routing::post(routes::composite::create))
        .route(
            "/composite/{product_id}",
            get(routes::composite::get).delete(routes::composite::delete),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Application state plus the background tasks it depends on.
pub struct Wiring {
    pub state: AppState,
    /// Event relays, one per channel. Empty unless the transport mode is
    /// `event`. Each finishes once every publisher of its channel is dropped.
    pub relays: Vec<JoinHandle<ProcessorStats>>,
}

/// Connects the composite to the leaf services as `config` describes.
///
/// In `event` mode the published events are relayed to the leaf services'
/// request/response endpoints by processors spawned on the current runtime.
pub fn build_state(config: &Config) -> integration::Result<Wiring> {
    let transport = HttpTransport::new(config.downstream_timeout)?;
    let urls = config.service_urls();
    let service_address = config.service_address();

    let wiring = match config.transport_mode {
        TransportMode::Blocking => {
            let client = BlockingIntegration::new(transport, &urls);
            let composite = CompositeService::new(
                client.clone(),
                client.clone(),
                client.clone(),
                service_address,
                ReadMode::Sequential,
            );
            Wiring {
                state: AppState::new(Arc::new(composite), Arc::new(client)),
                relays: Vec::new(),
            }
        }
        TransportMode::Reactive => {
            let client = ReactiveIntegration::new(transport, &urls);
            let composite = CompositeService::new(
                client.clone(),
                client.clone(),
                client.clone(),
                service_address,
                ReadMode::Concurrent,
            );
            Wiring {
                state: AppState::new(Arc::new(composite), Arc::new(client)),
                relays: Vec::new(),
            }
        }
        TransportMode::Event => {
            let (sources, sinks) = MessageSources::bounded(config.event_channel_capacity)
                .map_err(|e| IntegrationError::Configuration(e.to_string()))?;
            let writer = BlockingIntegration::new(transport.clone(), &urls);
            let relays = vec![
                tokio::spawn(
                    EventProcessor::new(
                        MessageSources::OUTPUT_PRODUCTS,
                        ProductEventRelay::new(writer.clone()),
                    )
                    .run(sinks.products),
                ),
                tokio::spawn(
                    EventProcessor::new(
                        MessageSources::OUTPUT_RECOMMENDATIONS,
                        RecommendationEventRelay::new(writer.clone()),
                    )
                    .run(sinks.recommendations),
                ),
                tokio::spawn(
                    EventProcessor::new(
                        MessageSources::OUTPUT_REVIEWS,
                        ReviewEventRelay::new(writer),
                    )
                    .run(sinks.reviews),
                ),
            ];

            let reads = ReactiveIntegration::new(transport, &urls);
            let client = EventIntegration::new(reads, sources);
            let composite = CompositeService::new(
                client.clone(),
                client.clone(),
                client.clone(),
                service_address,
                ReadMode::Concurrent,
            );
            Wiring {
                state: AppState::new(Arc::new(composite), Arc::new(client)),
                relays,
            }
        }
    };

    tracing::info!(
        mode = %config.transport_mode,
        product = %urls.product,
        recommendation = %urls.recommendation,
        review = %urls.review,
        "connected composite to leaf services"
    );
    Ok(wiring)
}
