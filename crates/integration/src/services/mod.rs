//! Capability traits of the leaf services and in-memory implementations.

pub mod product;
pub mod recommendation;
pub mod review;

pub use product::{InMemoryProductService, ProductService};
pub use recommendation::{InMemoryRecommendationService, RecommendationService};
pub use review::{InMemoryReviewService, ReviewService};

/// Number of calls an in-memory service received, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// Single gets and list lookups.
    pub get: usize,
    pub create: usize,
    pub delete: usize,
}
