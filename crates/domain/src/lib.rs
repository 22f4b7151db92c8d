//! Domain layer for the product composite system.
//!
//! This crate holds the entities owned by the three leaf services and the
//! aggregate view composed from them:
//! - `Product`, owned by the product service
//! - `Recommendation` and `Review`, keyed by `(product_id, id)`
//! - `ProductAggregate` with its summaries and `ServiceAddresses`
//!
//! The JSON shape of every type matches what the leaf services speak
//! (camelCase field names).

pub mod composite;
pub mod error;
pub mod product;
pub mod recommendation;
pub mod review;

pub use common::ProductId;
pub use composite::{ProductAggregate, RecommendationSummary, ReviewSummary, ServiceAddresses};
pub use error::ValidationError;
pub use product::Product;
pub use recommendation::Recommendation;
pub use review::Review;
