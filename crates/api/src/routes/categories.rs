//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use tradepost_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::ApiError;
use crate::models::category::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

/// Create a new category.
///
/// # Errors
///
/// Returns 400 for an empty or over-long name or a missing parent.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validate_name(&input.category_name)?;

    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List all categories.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Get a category by ID.
///
/// # Errors
///
/// Returns 404 when the category does not exist.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, ApiError> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("category {id} not found")))?;
    Ok(Json(category))
}

/// Update a category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<Category>, ApiError> {
    if let Some(name) = &input.category_name {
        validate_name(name)?;
    }

    let category = CategoryRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(category))
}

/// Delete a category.
///
/// # Errors
///
/// Returns 404 when it doesn't exist, 409 when products still reference it.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, ApiError> {
    let deleted = CategoryRepository::new(state.pool()).delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("category {id} not found")))
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "category_name must not be empty".to_owned(),
        ));
    }
    if name.len() > 50 {
        return Err(ApiError::BadRequest(
            "category_name must be at most 50 characters".to_owned(),
        ));
    }
    Ok(())
}
