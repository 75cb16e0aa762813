//! Product handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use catalog::{BatchUpdate, Product, ProductId, ProductPayload};

use super::super::{
    auth::CurrentUser,
    body::{LenientJson, id_filter},
    error::{ApiError, parse_product_id},
    state::AppState,
};

/// Query parameters for listing products.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    /// Case-insensitive search over name and description.
    pub q: Option<String>,
}

/// Body of a batch update.
#[derive(Debug, Deserialize, Default)]
pub struct BatchUpdateRequest {
    /// Ids to update; anything but an array updates every product.
    #[serde(default)]
    pub ids: Value,
    /// Field changes; anything but an object is treated as no changes.
    #[serde(default)]
    pub update: Value,
}

/// Body of a batch delete.
#[derive(Debug, Deserialize, Default)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Value,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: Vec<ProductId>,
}

/// List products, optionally filtered by `q`.
#[instrument(skip_all, fields(q = ?query.q))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list(query.q.as_deref())?;
    debug!(count = products.len(), "listed products");
    Ok(Json(products))
}

/// Get one product.
#[instrument(skip_all, fields(id = %id))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    state
        .products
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::product_not_found(id))
}

/// Create a product.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    LenientJson(payload): LenientJson<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create(payload)?;
    info!(id = product.id, "created product");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Merge fields into an existing product.
#[instrument(skip_all, fields(user = %user.username, id = %id))]
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    LenientJson(payload): LenientJson<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    state
        .products
        .update(id, payload)?
        .map(Json)
        .ok_or_else(|| ApiError::product_not_found(id))
}

/// Delete a product.
#[instrument(skip_all, fields(user = %user.username, id = %id))]
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&id)?;
    if state.products.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::product_not_found(id))
    }
}

/// Apply one set of field changes to many products.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn batch_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    LenientJson(body): LenientJson<BatchUpdateRequest>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let ids = id_filter(&body.ids);
    let fields: ProductPayload = match body.update {
        Value::Object(map) => map.into_iter().collect(),
        _ => ProductPayload::new(),
    };

    let update = BatchUpdate::parse(fields)?;
    let updated = state.products.batch_update(ids.as_deref(), &update)?;

    info!(
        filtered = ids.is_some(),
        count = updated.len(),
        "batch updated products"
    );
    Ok(Json(updated))
}

/// Delete many products, skipping ids that do not exist.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn batch_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    LenientJson(body): LenientJson<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, ApiError> {
    let ids = id_filter(&body.ids).unwrap_or_default();
    let deleted = state.products.batch_delete(&ids)?;
    info!(count = deleted.len(), "batch deleted products");
    Ok(Json(BatchDeleteResponse { deleted }))
}
