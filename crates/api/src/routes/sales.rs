//! Sale route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use tradepost_core::SaleId;

use crate::db::SaleRepository;
use crate::error::ApiError;
use crate::models::sale::{CreateSaleInput, Sale, SaleFilter};
use crate::state::AppState;

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale))
}

/// Record a sale. One available instance of the product is marked sold and
/// the inventory counters drop, all in one transaction.
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let sale = SaleRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List sales with filters, newest first.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = SaleRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(sales))
}

/// Get a sale by ID.
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<SaleId>,
) -> Result<Json<Sale>, ApiError> {
    let sale = SaleRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("sale {id} not found")))?;
    Ok(Json(sale))
}
