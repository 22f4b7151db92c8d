//! Domain error types.

use common::ProductId;
use thiserror::Error;

/// Basic field-presence failures detected before anything is sent downstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product identifiers must be greater than zero.
    #[error("Invalid productId: {0}")]
    InvalidProductId(ProductId),

    /// A required text field is empty.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}
