//! Health check endpoints.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use integration::HealthStatus;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — returns the composite's own health status.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /health/downstream — probes each leaf service.
///
/// Answers 503 when any of them is down.
#[tracing::instrument(skip(state))]
pub async fn downstream(
    State(state): State<AppState>,
) -> (StatusCode, Json<BTreeMap<String, HealthStatus>>) {
    let report = state.downstream.health().await;
    let status = if report.values().all(HealthStatus::is_up) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
