//! Product route handlers, including images and the rentability report.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use tradepost_core::{ImageId, ProductId, generate_sku};

use crate::db::{
    CategoryRepository, ImageRepository, PricePointRepository, ProductRepository, RepositoryError,
};
use crate::error::ApiError;
use crate::models::price_point::PriceHistoryEntry;
use crate::models::product::{
    CreateProductInput, Product, ProductDetail, ProductFilter, ProductImage, UpdateProductInput,
};
use crate::services::rentability::{self, ProductRentability};
use crate::state::AppState;

/// Uploaded images are capped at 5 MiB.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route(
            "/products/{id}/images",
            get(list_images)
                .post(upload_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route(
            "/products/{id}/images/{image_id}",
            get(get_image).delete(delete_image),
        )
        .route("/products/{id}/price-history", get(price_history))
        .route("/products-with-rentability", get(products_with_rentability))
}

/// Create a new product (and its inventory row).
///
/// The SKU is generated from the category name when omitted; a generated
/// SKU that collides is retried once.
///
/// # Errors
///
/// Returns 400 for a bad category, 409 for a duplicate explicit SKU.
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }
    if let Some(sku) = &input.sku
        && (sku.len() < 3 || sku.len() > 50)
    {
        return Err(ApiError::BadRequest(
            "sku must be between 3 and 50 characters".to_owned(),
        ));
    }

    let category = CategoryRepository::new(state.pool())
        .get(input.category_id)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("category {} does not exist", input.category_id))
        })?;

    let repo = ProductRepository::new(state.pool());
    let product = match &input.sku {
        Some(sku) => repo.create(sku, &input).await?,
        None => {
            let sku = generate_sku(&category.category_name);
            match repo.create(&sku, &input).await {
                // A generated SKU collided; one more draw settles it.
                Err(RepositoryError::Conflict(_)) => {
                    let retry = generate_sku(&category.category_name);
                    repo.create(&retry, &input).await?
                }
                other => other?,
            }
        }
    };

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products with filters, enriched with category, price, and stock.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductDetail>>, ApiError> {
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Get an enriched product by ID.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = ProductRepository::new(state.pool())
        .get_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id} not found")))?;
    Ok(Json(product))
}

/// Update a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, ApiError> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::BadRequest("name must not be empty".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(product))
}

/// Soft-delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    let deleted = ProductRepository::new(state.pool()).soft_delete(id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("product {id} not found")))
    }
}

// =============================================================================
// Images
// =============================================================================

/// Upload an image for a product (multipart field `file`, optional
/// `is_primary` flag).
///
/// # Errors
///
/// Returns 400 when the field is missing or not an image, 404 for an
/// unknown product.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductImage>), ApiError> {
    if !ProductRepository::new(state.pool()).exists(id).await? {
        return Err(ApiError::NotFound(format!("product {id} not found")));
    }

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut is_primary = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .ok_or_else(|| {
                        ApiError::BadRequest("file field must have a content type".to_owned())
                    })?
                    .to_owned();
                if !content_type.starts_with("image/") {
                    return Err(ApiError::BadRequest(format!(
                        "unsupported content type {content_type}, expected image/*"
                    )));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file: {e}")))?;
                upload = Some((content_type, data.to_vec()));
            }
            Some("is_primary") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid is_primary: {e}")))?;
                is_primary = value == "true" || value == "1";
            }
            _ => {}
        }
    }

    let (content_type, data) =
        upload.ok_or_else(|| ApiError::BadRequest("missing file field".to_owned()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_owned()));
    }

    let image = ImageRepository::new(state.pool())
        .insert(id, &content_type, &data, is_primary)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// List a product's image metadata.
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductImage>>, ApiError> {
    if !ProductRepository::new(state.pool()).exists(id).await? {
        return Err(ApiError::NotFound(format!("product {id} not found")));
    }
    let images = ImageRepository::new(state.pool()).list_for_product(id).await?;
    Ok(Json(images))
}

/// Serve one image's raw bytes with its stored content type.
pub async fn get_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(ProductId, ImageId)>,
) -> Result<impl IntoResponse, ApiError> {
    let (content_type, data) = ImageRepository::new(state.pool())
        .fetch(id, image_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("image {image_id} not found")))?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}

/// Delete an image.
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, image_id)): Path<(ProductId, ImageId)>,
) -> Result<StatusCode, ApiError> {
    let deleted = ImageRepository::new(state.pool()).delete(id, image_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("image {image_id} not found")))
    }
}

// =============================================================================
// Reports
// =============================================================================

/// A product's price change audit trail.
pub async fn price_history(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<PriceHistoryEntry>>, ApiError> {
    if !ProductRepository::new(state.pool()).exists(id).await? {
        return Err(ApiError::NotFound(format!("product {id} not found")));
    }
    let history = PricePointRepository::new(state.pool())
        .history_for_product(id)
        .await?;
    Ok(Json(history))
}

/// Rentability report over every active product.
pub async fn products_with_rentability(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRentability>>, ApiError> {
    let report = rentability::report(state.pool()).await?;
    Ok(Json(report))
}
