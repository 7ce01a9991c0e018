//! Database operations for product images.
//!
//! Blobs live in a BYTEA column; listing endpoints only return metadata and
//! the raw bytes are fetched one image at a time.

use sqlx::PgPool;

use tradepost_core::{ImageId, ProductId};

use super::RepositoryError;
use crate::models::product::ProductImage;

const IMAGE_META_COLUMNS: &str = "image_id, product_id, image_type, is_primary, created_at";

/// Repository for product image database operations.
pub struct ImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ImageRepository<'a> {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store an uploaded image.
    ///
    /// When `is_primary` is set, any previous primary image of the product
    /// is demoted in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when the product does not exist.
    pub async fn insert(
        &self,
        product_id: ProductId,
        image_type: &str,
        data: &[u8],
        is_primary: bool,
    ) -> Result<ProductImage, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if is_primary {
            sqlx::query("UPDATE product_images SET is_primary = FALSE WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO product_images (product_id, image_data, image_type, is_primary)
             VALUES ($1, $2, $3, $4)
             RETURNING {IMAGE_META_COLUMNS}"
        );
        let image = sqlx::query_as::<_, ProductImage>(&sql)
            .bind(product_id)
            .bind(data)
            .bind(image_type)
            .bind(is_primary)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "product does not exist"))?;

        tx.commit().await?;
        Ok(image)
    }

    /// List image metadata for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let sql = format!(
            "SELECT {IMAGE_META_COLUMNS} FROM product_images
             WHERE product_id = $1
             ORDER BY is_primary DESC, image_id"
        );
        let rows = sqlx::query_as::<_, ProductImage>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch one image's content type and bytes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fetch(
        &self,
        product_id: ProductId,
        image_id: ImageId,
    ) -> Result<Option<(String, Vec<u8>)>, RepositoryError> {
        let row: Option<(String, Vec<u8>)> = sqlx::query_as(
            "SELECT image_type, image_data FROM product_images
             WHERE product_id = $1 AND image_id = $2",
        )
        .bind(product_id)
        .bind(image_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Delete an image.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        product_id: ProductId,
        image_id: ImageId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM product_images WHERE product_id = $1 AND image_id = $2")
                .bind(product_id)
                .bind(image_id)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
