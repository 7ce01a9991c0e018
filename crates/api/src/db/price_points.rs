//! Database operations for price points and price history.

use sqlx::PgPool;

use tradepost_core::ProductId;

use super::RepositoryError;
use crate::models::price_point::{CreatePricePointInput, PriceHistoryEntry, PricePoint};

const PRICE_POINT_COLUMNS: &str = "price_point_id, product_id, base_cost, selling_price, \
     market_price, shipment_cost, currency, effective_from, effective_to, created_at";

const HISTORY_COLUMNS: &str =
    "history_id, product_id, old_price, new_price, change_date, change_reason, changed_by";

/// Repository for price point database operations.
pub struct PricePointRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PricePointRepository<'a> {
    /// Create a new price point repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new price point.
    ///
    /// The previous open price point is closed at the new one's
    /// `effective_from`, and a price history row is written when the selling
    /// price changed; everything in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when the product does not exist or
    /// an amount is negative.
    pub async fn create(
        &self,
        input: &CreatePricePointInput,
    ) -> Result<PricePoint, RepositoryError> {
        if input.base_cost.is_sign_negative()
            || input.selling_price.is_sign_negative()
            || input.market_price.is_some_and(|p| p.is_sign_negative())
            || input.shipment_cost.is_some_and(|c| c.is_sign_negative())
        {
            return Err(RepositoryError::Invalid(
                "prices and costs must be non-negative".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {PRICE_POINT_COLUMNS} FROM price_points
             WHERE product_id = $1
             ORDER BY effective_from DESC, price_point_id DESC
             LIMIT 1
             FOR UPDATE"
        );
        let previous = sqlx::query_as::<_, PricePoint>(&sql)
            .bind(input.product_id)
            .fetch_optional(&mut *tx)
            .await?;

        let sql = format!(
            "INSERT INTO price_points
                 (product_id, base_cost, selling_price, market_price, shipment_cost, currency,
                  effective_from)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0.00), COALESCE($6, 'USD'), COALESCE($7, now()))
             RETURNING {PRICE_POINT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, PricePoint>(&sql)
            .bind(input.product_id)
            .bind(input.base_cost)
            .bind(input.selling_price)
            .bind(input.market_price)
            .bind(input.shipment_cost)
            .bind(input.currency.as_deref())
            .bind(input.effective_from)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_foreign_key(e, "product does not exist"))?;

        if let Some(previous) = previous {
            sqlx::query(
                "UPDATE price_points SET effective_to = $2
                 WHERE price_point_id = $1 AND effective_to IS NULL",
            )
            .bind(previous.price_point_id)
            .bind(created.effective_from)
            .execute(&mut *tx)
            .await?;

            if previous.selling_price != created.selling_price {
                sqlx::query(
                    "INSERT INTO price_history
                         (product_id, old_price, new_price, change_reason, changed_by)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(input.product_id)
                .bind(previous.selling_price)
                .bind(created.selling_price)
                .bind(input.change_reason.as_deref())
                .bind(input.changed_by.as_deref().unwrap_or("system"))
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    /// List price points for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PricePoint>, RepositoryError> {
        let sql = format!(
            "SELECT {PRICE_POINT_COLUMNS} FROM price_points
             WHERE product_id = $1
             ORDER BY effective_from DESC, price_point_id DESC"
        );
        let rows = sqlx::query_as::<_, PricePoint>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// List a product's price change history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PriceHistoryEntry>, RepositoryError> {
        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM price_history
             WHERE product_id = $1
             ORDER BY change_date DESC, history_id DESC"
        );
        let rows = sqlx::query_as::<_, PriceHistoryEntry>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}
