//! Database operations for product instances.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use tradepost_core::{InstanceId, InstanceStatus, ProductId, StockLocation};

use super::RepositoryError;
use crate::models::instance::{
    CreateInstanceInput, InstanceFilter, ProductInstance, UpdateInstanceInput,
};

const INSTANCE_COLUMNS: &str =
    "instance_id, product_id, base_cost, status, purchase_date, location, created_at, updated_at";

/// Repository for product instance database operations.
pub struct InstanceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InstanceRepository<'a> {
    /// Create a new instance repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new instance.
    ///
    /// Defaults: status `available`, purchase date today, location Colombia.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when the product does not exist or
    /// the base cost is negative.
    pub async fn create(
        &self,
        input: &CreateInstanceInput,
    ) -> Result<ProductInstance, RepositoryError> {
        if input.base_cost.is_sign_negative() {
            return Err(RepositoryError::Invalid(
                "base_cost must be non-negative".to_owned(),
            ));
        }

        let status = input.status.unwrap_or(InstanceStatus::Available);
        let purchase_date: NaiveDate = input
            .purchase_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let location = input.location.unwrap_or(StockLocation::Colombia);

        let sql = format!(
            "INSERT INTO product_instances (product_id, base_cost, status, purchase_date, location)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {INSTANCE_COLUMNS}"
        );
        sqlx::query_as::<_, ProductInstance>(&sql)
            .bind(input.product_id)
            .bind(input.base_cost)
            .bind(status)
            .bind(purchase_date)
            .bind(location)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "product does not exist"))
    }

    /// List instances with filtering, oldest purchases first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &InstanceFilter,
    ) -> Result<Vec<ProductInstance>, RepositoryError> {
        let sql = format!(
            "SELECT {INSTANCE_COLUMNS} FROM product_instances
             WHERE ($1::int IS NULL OR product_id = $1)
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR location = $3)
             ORDER BY purchase_date, instance_id"
        );
        let rows = sqlx::query_as::<_, ProductInstance>(&sql)
            .bind(filter.product_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.location.map(|l| l.as_str()))
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Update an instance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the instance doesn't exist.
    pub async fn update(
        &self,
        id: InstanceId,
        input: &UpdateInstanceInput,
    ) -> Result<ProductInstance, RepositoryError> {
        let sql = format!(
            "UPDATE product_instances
             SET base_cost = COALESCE($2, base_cost),
                 status = COALESCE($3, status),
                 location = COALESCE($4, location)
             WHERE instance_id = $1
             RETURNING {INSTANCE_COLUMNS}"
        );
        sqlx::query_as::<_, ProductInstance>(&sql)
            .bind(id)
            .bind(input.base_cost)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.location.map(|l| l.as_str()))
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an instance.
    ///
    /// # Returns
    ///
    /// Returns `true` if the instance was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: InstanceId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_instances WHERE instance_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark the oldest available instance of a product sold, inside an
    /// existing transaction (FIFO by purchase date).
    ///
    /// Returns the instance marked, or `None` when the product has no
    /// available instances.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn mark_oldest_sold_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: ProductId,
    ) -> Result<Option<InstanceId>, RepositoryError> {
        let id: Option<InstanceId> = sqlx::query_scalar(
            "UPDATE product_instances
             SET status = 'sold'
             WHERE instance_id = (
                 SELECT instance_id FROM product_instances
                 WHERE product_id = $1 AND status = 'available'
                 ORDER BY purchase_date, instance_id
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING instance_id",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }
}
