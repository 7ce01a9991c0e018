//! Supplier route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use tradepost_core::{SupplierId, SupplierProductId};

use crate::db::SupplierRepository;
use crate::error::ApiError;
use crate::models::supplier::{
    CreateSupplierInput, LinkSupplierProductInput, Supplier, SupplierProduct, UpdateSupplierInput,
};
use crate::state::AppState;

/// Build the suppliers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/{id}",
            get(get_supplier)
                .patch(update_supplier)
                .delete(delete_supplier),
        )
        .route(
            "/suppliers/{id}/products",
            get(list_supplier_products).post(link_product),
        )
        .route(
            "/suppliers/{id}/products/{link_id}",
            axum::routing::delete(unlink_product),
        )
}

/// Query parameters for the supplier list.
#[derive(Debug, Deserialize)]
pub struct SupplierQuery {
    pub is_active: Option<bool>,
}

/// Create a supplier.
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }
    if input.credit_limit.is_some_and(|l| l.is_sign_negative()) {
        return Err(ApiError::BadRequest(
            "credit_limit must be non-negative".to_owned(),
        ));
    }

    let supplier = SupplierRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// List suppliers.
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierQuery>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = SupplierRepository::new(state.pool())
        .list(query.is_active)
        .await?;
    Ok(Json(suppliers))
}

/// Get a supplier by ID.
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = SupplierRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("supplier {id} not found")))?;
    Ok(Json(supplier))
}

/// Update a supplier.
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
    Json(input): Json<UpdateSupplierInput>,
) -> Result<Json<Supplier>, ApiError> {
    if input.credit_limit.is_some_and(|l| l.is_sign_negative()) {
        return Err(ApiError::BadRequest(
            "credit_limit must be non-negative".to_owned(),
        ));
    }

    let supplier = SupplierRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(supplier))
}

/// Soft-delete a supplier.
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<StatusCode, ApiError> {
    let deleted = SupplierRepository::new(state.pool()).soft_delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("supplier {id} not found")))
    }
}

/// Link a product to a supplier.
pub async fn link_product(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
    Json(input): Json<LinkSupplierProductInput>,
) -> Result<(StatusCode, Json<SupplierProduct>), ApiError> {
    if input.supplier_price.is_sign_negative() {
        return Err(ApiError::BadRequest(
            "supplier_price must be non-negative".to_owned(),
        ));
    }

    let link = SupplierRepository::new(state.pool())
        .link_product(id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// List the products linked to a supplier.
pub async fn list_supplier_products(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<Json<Vec<SupplierProduct>>, ApiError> {
    let links = SupplierRepository::new(state.pool()).list_products(id).await?;
    Ok(Json(links))
}

/// Remove a supplier/product link.
pub async fn unlink_product(
    State(state): State<AppState>,
    Path((id, link_id)): Path<(SupplierId, SupplierProductId)>,
) -> Result<StatusCode, ApiError> {
    let removed = SupplierRepository::new(state.pool())
        .unlink_product(id, link_id)
        .await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("link {link_id} not found")))
    }
}
