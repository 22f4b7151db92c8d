//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::HttpErrorInfo;
use composite::CompositeError;
use integration::IntegrationError;

/// API-level error type that maps to HTTP responses.
///
/// Every variant carries the request path, which is echoed in the error
/// envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request, e.g. a non-numeric product id.
    BadRequest { path: String, message: String },
    /// The request body could not be read as an aggregate.
    Body {
        path: String,
        rejection: JsonRejection,
    },
    /// A composite operation failed.
    Composite {
        path: String,
        source: CompositeError,
    },
}

impl ApiError {
    pub fn bad_request(path: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn body(path: impl Into<String>, rejection: JsonRejection) -> Self {
        ApiError::Body {
            path: path.into(),
            rejection,
        }
    }

    pub fn composite(path: impl Into<String>, source: CompositeError) -> Self {
        ApiError::Composite {
            path: path.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, path, message) = match self {
            ApiError::BadRequest { path, message } => (StatusCode::BAD_REQUEST, path, message),
            ApiError::Body { path, rejection } => (rejection.status(), path, rejection.body_text()),
            ApiError::Composite { path, source } => {
                let (status, message) = composite_error_to_response(source);
                (status, path, message)
            }
        };

        if status.is_server_error() {
            tracing::error!(%status, %path, error = %message, "request failed");
        }

        let body = HttpErrorInfo::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            path,
            message,
        );
        (status, axum::Json(body)).into_response()
    }
}

fn composite_error_to_response(err: CompositeError) -> (StatusCode, String) {
    match err {
        CompositeError::InvalidInput(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        CompositeError::Integration(e) => integration_error_to_response(e),
    }
}

fn integration_error_to_response(err: IntegrationError) -> (StatusCode, String) {
    match err {
        IntegrationError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        IntegrationError::InvalidInput(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        IntegrationError::UnexpectedStatus {
            status,
            message,
            body,
        } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let message = HttpErrorInfo::message_from_body(&body)
                .or_else(|| (!body.is_empty()).then_some(body))
                .unwrap_or(message);
            (status, message)
        }
        err @ IntegrationError::Unavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        err @ IntegrationError::Decode { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
        err @ IntegrationError::Publish(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        err @ IntegrationError::Configuration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;
    use domain::ValidationError;

    fn status_of(err: IntegrationError) -> (StatusCode, String) {
        composite_error_to_response(CompositeError::from(err))
    }

    #[test]
    fn test_downstream_messages_pass_through() {
        assert_eq!(
            status_of(IntegrationError::NotFound("No product found for productId: 13".into())),
            (
                StatusCode::NOT_FOUND,
                "No product found for productId: 13".to_string()
            )
        );
        assert_eq!(
            status_of(IntegrationError::InvalidInput("Invalid productId: -1".into())).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_unexpected_status_keeps_downstream_status() {
        let (status, message) = status_of(IntegrationError::UnexpectedStatus {
            status: 500,
            message: "500 Internal Server Error".into(),
            body: r#"{"message":"boom"}"#.into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "boom");

        let (_, message) = status_of(IntegrationError::UnexpectedStatus {
            status: 502,
            message: "502 Bad Gateway".into(),
            body: String::new(),
        });
        assert_eq!(message, "502 Bad Gateway");
    }

    #[test]
    fn test_transport_failures() {
        assert_eq!(
            status_of(IntegrationError::unavailable("http://p", "timeout")).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(IntegrationError::Decode {
                url: "http://p".into(),
                reason: "eof".into()
            })
            .0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let (status, message) = composite_error_to_response(CompositeError::from(
            ValidationError::InvalidProductId(ProductId::new(0)),
        ));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "Invalid productId: 0");
    }
}
