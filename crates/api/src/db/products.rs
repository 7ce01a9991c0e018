//! Database operations for products.
//!
//! Product creation also seeds the product's inventory row (quantity 0) so
//! every product has stock levels from the moment it exists; both inserts
//! share one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use tradepost_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::category::Category;
use crate::models::product::{
    CreateProductInput, Product, ProductDetail, ProductFilter, UpdateProductInput,
};

const PRODUCT_COLUMNS: &str = "product_id, sku, category_id, name, description, condition, \
     edition, rarity, set_name, set_code, language, location, purchase_date, obtained_method, \
     is_active, created_at, updated_at";

/// Internal row type for the enriched product listing.
#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    #[sqlx(flatten)]
    product: Product,
    cat_name: Option<String>,
    cat_parent_id: Option<CategoryId>,
    cat_created_at: Option<DateTime<Utc>>,
    cat_updated_at: Option<DateTime<Utc>>,
    current_price: Option<Decimal>,
    available_quantity: Option<i32>,
    on_hand_quantity: Option<i32>,
}

impl From<ProductDetailRow> for ProductDetail {
    fn from(row: ProductDetailRow) -> Self {
        let category = row.cat_name.map(|category_name| Category {
            category_id: row.product.category_id,
            category_name,
            parent_category_id: row.cat_parent_id,
            created_at: row.cat_created_at.unwrap_or(row.product.created_at),
            updated_at: row.cat_updated_at.unwrap_or(row.product.updated_at),
        });

        Self {
            product: row.product,
            category,
            current_price: row.current_price,
            available_quantity: row.available_quantity,
            quantity: row.on_hand_quantity,
        }
    }
}

const DETAIL_SELECT: &str = "SELECT p.product_id, p.sku, p.category_id, p.name, p.description, \
       p.condition, p.edition, p.rarity, p.set_name, p.set_code, p.language, p.location, \
       p.purchase_date, p.obtained_method, p.is_active, p.created_at, p.updated_at, \
       c.category_name AS cat_name, c.parent_category_id AS cat_parent_id, \
       c.created_at AS cat_created_at, c.updated_at AS cat_updated_at, \
       pp.selling_price AS current_price, \
       i.available_quantity, i.quantity AS on_hand_quantity \
     FROM products p \
     LEFT JOIN product_categories c ON c.category_id = p.category_id \
     LEFT JOIN LATERAL ( \
         SELECT selling_price FROM price_points \
         WHERE product_id = p.product_id \
         ORDER BY effective_from DESC, price_point_id DESC \
         LIMIT 1 \
     ) pp ON TRUE \
     LEFT JOIN inventory i ON i.product_id = p.product_id";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product and its inventory row in one transaction.
    ///
    /// The caller has already resolved the SKU (explicit or generated).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the SKU is taken,
    /// `RepositoryError::Invalid` when the category does not exist.
    pub async fn create(
        &self,
        sku: &str,
        input: &CreateProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO products (sku, category_id, name, description, condition, edition, \
                 rarity, set_name, set_code, language, location, purchase_date, obtained_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.condition)
            .bind(input.edition.as_deref())
            .bind(input.rarity.as_deref())
            .bind(input.set_name.as_deref())
            .bind(input.set_code.as_deref())
            .bind(input.language.as_deref())
            .bind(input.location.as_deref())
            .bind(input.purchase_date)
            .bind(input.obtained_method.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.constraint() == Some("products_sku_key") {
                        return RepositoryError::Conflict("SKU already exists".to_owned());
                    }
                    if db_err.is_foreign_key_violation() {
                        return RepositoryError::Invalid("category does not exist".to_owned());
                    }
                }
                RepositoryError::Database(e)
            })?;

        sqlx::query("INSERT INTO inventory (product_id) VALUES ($1)")
            .bind(product.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    /// List products with filters, enriched with category, current price,
    /// and stock levels.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductDetail>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let skip = filter.skip.unwrap_or(0);

        let sql = format!(
            "{DETAIL_SELECT}
             WHERE ($1::int IS NULL OR p.category_id = $1)
               AND ($2::text IS NULL OR p.condition = $2)
               AND ($3::bool IS NULL OR p.is_active = $3)
               AND ($4::text IS NULL OR p.location = $4)
             ORDER BY p.product_id
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(filter.category_id)
            .bind(filter.condition.map(|c| c.as_str()))
            .bind(filter.is_active)
            .bind(filter.location.as_deref())
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an enriched product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_detail(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let sql = format!("{DETAIL_SELECT} WHERE p.product_id = $1");
        let row = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::Invalid` when the new category does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 condition = COALESCE($4, condition),
                 category_id = COALESCE($5, category_id),
                 location = COALESCE($6, location),
                 is_active = COALESCE($7, is_active)
             WHERE product_id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.condition.map(|c| c.as_str()))
            .bind(input.category_id)
            .bind(input.location.as_deref())
            .bind(input.is_active)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "category does not exist"))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a product by clearing `is_active`.
    ///
    /// Historical sales and order items keep referencing it.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE products SET is_active = FALSE WHERE product_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a product exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM products WHERE product_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(found.is_some())
    }
}
