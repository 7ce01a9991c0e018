//! Product category domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradepost_core::CategoryId;

/// A product category, optionally nested under a parent category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub category_id: CategoryId,
    /// Display name.
    pub category_name: String,
    /// Parent category for nested hierarchies.
    pub parent_category_id: Option<CategoryId>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// Display name (1-50 characters).
    pub category_name: String,
    /// Optional parent category; must exist.
    pub parent_category_id: Option<CategoryId>,
}

/// Input for updating a category. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryInput {
    pub category_name: Option<String>,
    pub parent_category_id: Option<CategoryId>,
}
