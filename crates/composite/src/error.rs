//! Composite error types.

use domain::ValidationError;
use integration::IntegrationError;
use thiserror::Error;

/// Errors returned by composite operations.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// A leaf service call failed; the downstream error is kept as-is.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// The aggregate was rejected before any downstream call.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
}

impl CompositeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CompositeError::Integration(e) if e.is_not_found())
    }

    pub fn is_invalid_input(&self) -> bool {
        match self {
            CompositeError::InvalidInput(_) => true,
            CompositeError::Integration(e) => e.is_invalid_input(),
        }
    }
}

/// Convenience type alias for composite results.
pub type Result<T> = std::result::Result<T, CompositeError>;
