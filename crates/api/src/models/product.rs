//! Product domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{CategoryId, ImageId, ProductCondition, ProductId};

use super::category::Category;

/// A catalogued product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub product_id: ProductId,
    /// Stock-keeping unit; unique, generated when not supplied.
    pub sku: String,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Physical condition grade.
    pub condition: ProductCondition,
    /// Print edition, if applicable.
    pub edition: Option<String>,
    /// Rarity grade, if applicable.
    pub rarity: Option<String>,
    /// Set the product belongs to.
    pub set_name: Option<String>,
    /// Abbreviated set code.
    pub set_code: Option<String>,
    /// Product language.
    pub language: Option<String>,
    /// Where the product is held.
    pub location: Option<String>,
    /// When the product was purchased.
    pub purchase_date: Option<NaiveDate>,
    /// How the product was obtained (purchase, trade, ...).
    pub obtained_method: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product enriched with its category, current price, and stock level.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// The owning category, when it still exists.
    pub category: Option<Category>,
    /// Selling price from the latest price point.
    pub current_price: Option<Decimal>,
    /// Available quantity from the inventory row.
    pub available_quantity: Option<i32>,
    /// On-hand quantity from the inventory row.
    pub quantity: Option<i32>,
}

/// Input for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Explicit SKU; generated from the category name when omitted.
    pub sku: Option<String>,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub condition: ProductCondition,
    pub edition: Option<String>,
    pub rarity: Option<String>,
    pub set_name: Option<String>,
    pub set_code: Option<String>,
    pub language: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub obtained_method: Option<String>,
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub condition: Option<ProductCondition>,
    pub category_id: Option<CategoryId>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Filter criteria for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub condition: Option<ProductCondition>,
    pub is_active: Option<bool>,
    pub location: Option<String>,
    /// Number of results to skip.
    pub skip: Option<i64>,
    /// Maximum number of results.
    pub limit: Option<i64>,
}

/// Stored image metadata (the blob itself is fetched separately).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductImage {
    pub image_id: ImageId,
    pub product_id: ProductId,
    /// MIME content type, e.g. `image/png`.
    pub image_type: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
