//! Database operations for product categories.

use sqlx::PgPool;

use tradepost_core::CategoryId;

use super::RepositoryError;
use crate::models::category::{Category, CreateCategoryInput, UpdateCategoryInput};

const CATEGORY_COLUMNS: &str =
    "category_id, category_name, parent_category_id, created_at, updated_at";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when the parent category does not
    /// exist, `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CreateCategoryInput) -> Result<Category, RepositoryError> {
        let sql = format!(
            "INSERT INTO product_categories (category_name, parent_category_id)
             VALUES ($1, $2)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&input.category_name)
            .bind(input.parent_category_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "parent category does not exist"))
    }

    /// List all categories, parents before children by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM product_categories ORDER BY category_id");
        let rows = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let sql =
            format!("SELECT {CATEGORY_COLUMNS} FROM product_categories WHERE category_id = $1");
        let row = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist,
    /// `RepositoryError::Invalid` when the new parent does not exist.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &UpdateCategoryInput,
    ) -> Result<Category, RepositoryError> {
        let sql = format!(
            "UPDATE product_categories
             SET category_name = COALESCE($2, category_name),
                 parent_category_id = COALESCE($3, parent_category_id)
             WHERE category_id = $1
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(input.category_name.as_deref())
            .bind(input.parent_category_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "parent category does not exist"))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when products (or child
    /// categories) still reference it.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_categories WHERE category_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "category is still referenced by products or child categories".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
