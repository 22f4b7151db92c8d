//! The product composite: one aggregate view over three leaf services.
//!
//! [`CompositeService`] reads, creates and deletes [`domain::ProductAggregate`]s
//! through the capability traits of the `integration` crate, so the same
//! state machines run over HTTP, over events or against in-memory fakes.

pub mod error;
pub mod service;

pub use error::{CompositeError, Result};
pub use service::{CompositeService, ProductCompositeService, ReadMode};
