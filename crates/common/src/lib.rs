//! Shared types for the product composite system.

pub mod error_info;
pub mod types;

pub use error_info::HttpErrorInfo;
pub use types::{ProductId, service_address};
