//! Inventory route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use tradepost_core::ProductId;

use crate::db::InventoryRepository;
use crate::error::ApiError;
use crate::models::inventory::{
    Inventory, InventoryTransaction, RecordTransactionInput, UpdateInventoryInput,
};
use crate::state::AppState;

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory))
        .route("/inventory/transactions", post(record_transaction))
        .route(
            "/inventory/{product_id}",
            get(get_inventory).patch(update_inventory),
        )
        .route(
            "/inventory/{product_id}/transactions",
            get(list_transactions),
        )
}

/// Query parameters for the inventory list.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// Only rows at or below their reorder point.
    pub below_reorder: Option<bool>,
}

/// List inventory rows.
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<Inventory>>, ApiError> {
    let rows = InventoryRepository::new(state.pool())
        .list(query.below_reorder.unwrap_or(false))
        .await?;
    Ok(Json(rows))
}

/// Get the inventory row for a product.
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Inventory>, ApiError> {
    let row = InventoryRepository::new(state.pool())
        .get_by_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no inventory for product {product_id}")))?;
    Ok(Json(row))
}

/// Directly set levels for a product.
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<UpdateInventoryInput>,
) -> Result<Json<Inventory>, ApiError> {
    let row = InventoryRepository::new(state.pool())
        .update_levels(product_id, &input)
        .await?;
    Ok(Json(row))
}

/// Record an inventory movement.
///
/// # Errors
///
/// Returns 400 for movements the stock cannot absorb, 404 for an unknown
/// inventory row.
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(input): Json<RecordTransactionInput>,
) -> Result<(StatusCode, Json<InventoryTransaction>), ApiError> {
    if input.created_by.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "created_by must not be empty".to_owned(),
        ));
    }

    let recorded = InventoryRepository::new(state.pool())
        .record_transaction(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// The movement audit trail for a product, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<InventoryTransaction>>, ApiError> {
    let rows = InventoryRepository::new(state.pool())
        .list_transactions(product_id)
        .await?;
    Ok(Json(rows))
}
