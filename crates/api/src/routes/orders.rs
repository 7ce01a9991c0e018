//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tradepost_core::OrderId;

use crate::db::OrderRepository;
use crate::error::ApiError;
use crate::models::order::{CreateOrderInput, Order, OrderWithItems, UpdateOrderInput};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).patch(update_order))
}

/// Create an order with line items.
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderWithItems>), ApiError> {
    let order = OrderRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders, newest first.
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// Get an order with its items.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>, ApiError> {
    let order = OrderRepository::new(state.pool())
        .get_with_items(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id} not found")))?;
    Ok(Json(order))
}

/// Update an order's status or notes. Completed and cancelled orders are
/// terminal.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(input): Json<UpdateOrderInput>,
) -> Result<Json<Order>, ApiError> {
    let order = OrderRepository::new(state.pool()).update(id, &input).await?;
    Ok(Json(order))
}
