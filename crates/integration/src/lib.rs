//! Downstream clients for the three leaf services.
//!
//! Each leaf service is reached through a capability trait
//! ([`ProductService`], [`RecommendationService`], [`ReviewService`]).
//! Three adapters implement all of them:
//! - [`BlockingIntegration`]: request/response over HTTP. Recommendation and
//!   review lookups degrade to an empty list on any failure.
//! - [`ReactiveIntegration`]: the same HTTP calls against the reactive
//!   endpoints, meant to be polled concurrently. Failures are returned as-is.
//! - [`EventIntegration`]: writes become events on per-entity channels;
//!   reads go to the reactive endpoints.
//!
//! Non-2xx responses go through [`translate`], which turns them into
//! `NotFound`/`InvalidInput` with the downstream's own message.

pub mod blocking;
pub mod error;
pub mod health;
pub mod http;
pub mod messaging;
pub mod reactive;
pub mod relay;
pub mod services;
pub mod translator;

pub use blocking::BlockingIntegration;
pub use error::{IntegrationError, Result};
pub use health::{DownstreamHealth, HealthStatus};
pub use http::{Endpoints, HttpTransport, ServiceUrls};
pub use messaging::EventIntegration;
pub use reactive::ReactiveIntegration;
pub use relay::{ProductEventRelay, RecommendationEventRelay, ReviewEventRelay};
pub use services::{
    CallCounts, InMemoryProductService, InMemoryRecommendationService, InMemoryReviewService,
    ProductService, RecommendationService, ReviewService,
};
pub use translator::translate;
