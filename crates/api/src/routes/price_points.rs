//! Price point route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use tradepost_core::ProductId;

use crate::db::{PricePointRepository, ProductRepository};
use crate::error::ApiError;
use crate::models::price_point::{CreatePricePointInput, PricePoint};
use crate::state::AppState;

/// Build the price points router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/price-points",
        get(list_price_points).post(create_price_point),
    )
}

/// Query parameters for the price point list.
#[derive(Debug, Deserialize)]
pub struct PricePointQuery {
    pub product_id: ProductId,
}

/// Create a price point, closing the previous one and recording the price
/// change.
pub async fn create_price_point(
    State(state): State<AppState>,
    Json(input): Json<CreatePricePointInput>,
) -> Result<(StatusCode, Json<PricePoint>), ApiError> {
    if !ProductRepository::new(state.pool())
        .exists(input.product_id)
        .await?
    {
        return Err(ApiError::NotFound(format!(
            "product {} not found",
            input.product_id
        )));
    }
    if let Some(currency) = &input.currency
        && (currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()))
    {
        return Err(ApiError::BadRequest(
            "currency must be a 3-letter uppercase code".to_owned(),
        ));
    }

    let price_point = PricePointRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(price_point)))
}

/// List a product's price points, newest first.
pub async fn list_price_points(
    State(state): State<AppState>,
    Query(query): Query<PricePointQuery>,
) -> Result<Json<Vec<PricePoint>>, ApiError> {
    let price_points = PricePointRepository::new(state.pool())
        .list_for_product(query.product_id)
        .await?;
    Ok(Json(price_points))
}
