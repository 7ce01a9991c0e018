//! Database operations for sales.
//!
//! Recording a sale is the one flow that touches three tables at once: the
//! sale row itself, the product's oldest available instance (marked sold,
//! FIFO), and the inventory counters with their audit row. All of it commits
//! or rolls back together.

use sqlx::PgPool;

use tradepost_core::SaleId;

use super::instances::InstanceRepository;
use super::inventory::InventoryRepository;
use super::{RepositoryError, products::ProductRepository};
use crate::models::sale::{CreateSaleInput, Sale, SaleFilter};

const SALE_COLUMNS: &str =
    "sale_id, product_id, sale_price, sale_date, payment_method, notes, created_at";

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product does not exist,
    /// `RepositoryError::Invalid` for a negative price.
    pub async fn create(&self, input: &CreateSaleInput) -> Result<Sale, RepositoryError> {
        if input.sale_price.is_sign_negative() {
            return Err(RepositoryError::Invalid(
                "sale_price must be non-negative".to_owned(),
            ));
        }

        if !ProductRepository::new(self.pool)
            .exists(input.product_id)
            .await?
        {
            return Err(RepositoryError::NotFound);
        }

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO sales (product_id, sale_price, sale_date, payment_method, notes)
             VALUES ($1, $2, COALESCE($3, now()), $4, $5)
             RETURNING {SALE_COLUMNS}"
        );
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(input.product_id)
            .bind(input.sale_price)
            .bind(input.sale_date)
            .bind(input.payment_method)
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        // One physical unit leaves stock: oldest available instance first,
        // then the counters. Products that predate instance or inventory
        // tracking still sell; those steps are skipped.
        InstanceRepository::mark_oldest_sold_in_tx(&mut tx, input.product_id).await?;

        let reference = format!("sale-{}", sale.sale_id);
        InventoryRepository::deduct_sale_in_tx(&mut tx, input.product_id, &reference, "sales-api")
            .await?;

        tx.commit().await?;
        Ok(sale)
    }

    /// List sales with filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &SaleFilter) -> Result<Vec<Sale>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let skip = filter.skip.unwrap_or(0);

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales
             WHERE ($1::int IS NULL OR product_id = $1)
               AND ($2::text IS NULL OR payment_method = $2)
               AND ($3::timestamptz IS NULL OR sale_date >= $3)
               AND ($4::timestamptz IS NULL OR sale_date <= $4)
             ORDER BY sale_date DESC, sale_id DESC
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, Sale>(&sql)
            .bind(filter.product_id)
            .bind(filter.payment_method.map(|m| m.as_str()))
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE sale_id = $1");
        let row = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }
}
