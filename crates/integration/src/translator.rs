//! Maps failed downstream responses to domain errors.

use common::HttpErrorInfo;
use reqwest::StatusCode;

use crate::error::IntegrationError;

/// Translates a non-2xx response into an [`IntegrationError`].
///
/// 404 becomes `NotFound` and 422 becomes `InvalidInput`, both carrying the
/// `message` of the downstream error envelope. When the body is not an
/// envelope, `fallback` (the transport's own error text) is used instead.
/// Every other status is logged with its raw body and returned as
/// `UnexpectedStatus`.
pub fn translate(status: StatusCode, body: &str, fallback: &str) -> IntegrationError {
    match status {
        StatusCode::NOT_FOUND => IntegrationError::NotFound(error_message(body, fallback)),
        StatusCode::UNPROCESSABLE_ENTITY => {
            IntegrationError::InvalidInput(error_message(body, fallback))
        }
        _ => {
            tracing::error!(status = status.as_u16(), "got an unexpected HTTP error, will rethrow it");
            tracing::error!(body, "error body");
            IntegrationError::UnexpectedStatus {
                status: status.as_u16(),
                message: error_message(body, fallback),
                body: body.to_string(),
            }
        }
    }
}

fn error_message(body: &str, fallback: &str) -> String {
    HttpErrorInfo::message_from_body(body).unwrap_or_else(|| fallback.to_string())
}
