//! Product instance route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};

use tradepost_core::InstanceId;

use crate::db::{InstanceRepository, ProductRepository};
use crate::error::ApiError;
use crate::models::instance::{
    CreateInstanceInput, InstanceFilter, ProductInstance, UpdateInstanceInput,
};
use crate::state::AppState;

/// Build the instances router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instances", get(list_instances).post(create_instance))
        .route(
            "/instances/{id}",
            patch(update_instance).delete(delete_instance),
        )
}

/// Create an instance.
pub async fn create_instance(
    State(state): State<AppState>,
    Json(input): Json<CreateInstanceInput>,
) -> Result<(StatusCode, Json<ProductInstance>), ApiError> {
    if !ProductRepository::new(state.pool())
        .exists(input.product_id)
        .await?
    {
        return Err(ApiError::NotFound(format!(
            "product {} not found",
            input.product_id
        )));
    }

    let instance = InstanceRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// List instances with filters.
pub async fn list_instances(
    State(state): State<AppState>,
    Query(filter): Query<InstanceFilter>,
) -> Result<Json<Vec<ProductInstance>>, ApiError> {
    let instances = InstanceRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(instances))
}

/// Update an instance.
pub async fn update_instance(
    State(state): State<AppState>,
    Path(id): Path<InstanceId>,
    Json(input): Json<UpdateInstanceInput>,
) -> Result<Json<ProductInstance>, ApiError> {
    if input.base_cost.is_some_and(|c| c.is_sign_negative()) {
        return Err(ApiError::BadRequest(
            "base_cost must be non-negative".to_owned(),
        ));
    }

    let instance = InstanceRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(instance))
}

/// Delete an instance.
pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<InstanceId>,
) -> Result<StatusCode, ApiError> {
    let deleted = InstanceRepository::new(state.pool()).delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("instance {id} not found")))
    }
}
