//! Product aggregate endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use common::ProductId;
use domain::ProductAggregate;

use super::AppState;
use crate::error::ApiError;

/// GET /composite/{productId} — the aggregate for one product.
#[tracing::instrument(skip(state, uri))]
pub async fn get(
    State(state): State<AppState>,
    uri: Uri,
    Path(product_id): Path<String>,
) -> Result<Json<ProductAggregate>, ApiError> {
    let product_id = parse_product_id(&uri, &product_id)?;
    let aggregate = state
        .composite
        .get_composite_product(product_id)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;
    Ok(Json(aggregate))
}

/// POST /composite — create a product with its recommendations and reviews.
#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    uri: Uri,
    body: Result<Json<ProductAggregate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::body(uri.path(), rejection))?;
    tracing::debug!(product_id = %body.product_id, "create composite product");
    state
        .composite
        .create_composite_product(body)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;
    Ok(StatusCode::OK)
}

/// DELETE /composite/{productId} — remove a product and everything keyed to it.
#[tracing::instrument(skip(state, uri))]
pub async fn delete(
    State(state): State<AppState>,
    uri: Uri,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_product_id(&uri, &product_id)?;
    state
        .composite
        .delete_composite_product(product_id)
        .await
        .map_err(|e| ApiError::composite(uri.path(), e))?;
    Ok(StatusCode::OK)
}

fn parse_product_id(uri: &Uri, raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::bad_request(
            uri.path(),
            format!("Type mismatch: '{raw}' is not a valid productId"),
        )
    })
}
