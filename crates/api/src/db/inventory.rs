//! Database operations for inventory levels and the movement audit trail.

use sqlx::PgPool;

use tradepost_core::{InventoryId, ProductId, TransactionType};

use super::RepositoryError;
use crate::models::inventory::{
    Inventory, InventoryTransaction, RecordTransactionInput, StockLevels, UpdateInventoryInput,
    apply_movement,
};

const INVENTORY_COLUMNS: &str = "inventory_id, product_id, quantity, available_quantity, \
     reserved_quantity, reorder_point, last_restock_date, created_at, updated_at";

const TRANSACTION_COLUMNS: &str = "transaction_id, inventory_id, transaction_type, quantity, \
     reference_id, transaction_date, notes, created_by";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List inventory rows, optionally only those at or below their reorder
    /// point.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, below_reorder: bool) -> Result<Vec<Inventory>, RepositoryError> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory
             WHERE ($1 = FALSE OR available_quantity <= reorder_point)
             ORDER BY inventory_id"
        );
        let rows = sqlx::query_as::<_, Inventory>(&sql)
            .bind(below_reorder)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get the inventory row for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Inventory>, RepositoryError> {
        let sql = format!("SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = $1");
        let row = sqlx::query_as::<_, Inventory>(&sql)
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Directly set inventory levels for a product.
    ///
    /// Setting `quantity` recomputes `available_quantity` as
    /// `quantity - reserved_quantity`; a quantity below the reserved amount
    /// is rejected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product has no inventory
    /// row, `RepositoryError::Invalid` for a quantity below reservations.
    pub async fn update_levels(
        &self,
        product_id: ProductId,
        input: &UpdateInventoryInput,
    ) -> Result<Inventory, RepositoryError> {
        if input.quantity.is_some_and(|q| q < 0) || input.reorder_point.is_some_and(|r| r < 0) {
            return Err(RepositoryError::Invalid(
                "quantity and reorder_point must be non-negative".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = $1 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, Inventory>(&sql)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let quantity = input.quantity.unwrap_or(current.quantity);
        if quantity < current.reserved_quantity {
            return Err(RepositoryError::Invalid(format!(
                "quantity {quantity} is below the reserved amount {}",
                current.reserved_quantity
            )));
        }
        let available = quantity - current.reserved_quantity;
        let reorder_point = input.reorder_point.unwrap_or(current.reorder_point);

        let sql = format!(
            "UPDATE inventory
             SET quantity = $2, available_quantity = $3, reorder_point = $4
             WHERE inventory_id = $1
             RETURNING {INVENTORY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Inventory>(&sql)
            .bind(current.inventory_id)
            .bind(quantity)
            .bind(available)
            .bind(reorder_point)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Record an inventory movement and adjust the levels accordingly.
    ///
    /// The inventory row is locked, the movement applied through
    /// [`apply_movement`], and the audit row inserted; all inside one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the inventory row doesn't
    /// exist and `RepositoryError::Invalid` when the movement is rejected.
    pub async fn record_transaction(
        &self,
        input: &RecordTransactionInput,
    ) -> Result<InventoryTransaction, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE inventory_id = $1 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, Inventory>(&sql)
            .bind(input.inventory_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let next = apply_movement(
            StockLevels {
                quantity: current.quantity,
                available: current.available_quantity,
                reserved: current.reserved_quantity,
            },
            input.transaction_type,
            input.quantity,
        )
        .map_err(|e| RepositoryError::Invalid(e.to_string()))?;

        let stamp_restock = input.transaction_type == TransactionType::Restock;
        sqlx::query(
            "UPDATE inventory
             SET quantity = $2, available_quantity = $3, reserved_quantity = $4,
                 last_restock_date = CASE WHEN $5 THEN now() ELSE last_restock_date END
             WHERE inventory_id = $1",
        )
        .bind(current.inventory_id)
        .bind(next.quantity)
        .bind(next.available)
        .bind(next.reserved)
        .bind(stamp_restock)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "INSERT INTO inventory_transactions
                 (inventory_id, transaction_type, quantity, reference_id, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TRANSACTION_COLUMNS}"
        );
        let recorded = sqlx::query_as::<_, InventoryTransaction>(&sql)
            .bind(input.inventory_id)
            .bind(input.transaction_type)
            .bind(input.quantity)
            .bind(input.reference_id.as_deref())
            .bind(input.notes.as_deref())
            .bind(&input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(recorded)
    }

    /// List the movement audit trail for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_transactions(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<InventoryTransaction>, RepositoryError> {
        let sql = format!(
            "SELECT t.transaction_id, t.inventory_id, t.transaction_type, t.quantity, \
                    t.reference_id, t.transaction_date, t.notes, t.created_by
             FROM inventory_transactions t
             JOIN inventory i ON i.inventory_id = t.inventory_id
             WHERE i.product_id = $1
             ORDER BY t.transaction_date DESC, t.transaction_id DESC"
        );
        let rows = sqlx::query_as::<_, InventoryTransaction>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Record a `sale` movement inside an existing transaction, skipping
    /// silently when the product has no stock to deduct.
    ///
    /// Used by the sales flow, where inventory may legitimately be empty for
    /// products that predate stock tracking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub(crate) async fn deduct_sale_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: ProductId,
        reference_id: &str,
        created_by: &str,
    ) -> Result<Option<InventoryId>, RepositoryError> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE product_id = $1 FOR UPDATE"
        );
        let Some(current) = sqlx::query_as::<_, Inventory>(&sql)
            .bind(product_id)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let Ok(next) = apply_movement(
            StockLevels {
                quantity: current.quantity,
                available: current.available_quantity,
                reserved: current.reserved_quantity,
            },
            TransactionType::Sale,
            1,
        ) else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE inventory SET quantity = $2, available_quantity = $3 WHERE inventory_id = $1",
        )
        .bind(current.inventory_id)
        .bind(next.quantity)
        .bind(next.available)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO inventory_transactions
                 (inventory_id, transaction_type, quantity, reference_id, created_by)
             VALUES ($1, 'sale', 1, $2, $3)",
        )
        .bind(current.inventory_id)
        .bind(reference_id)
        .bind(created_by)
        .execute(&mut **tx)
        .await?;

        Ok(Some(current.inventory_id))
    }
}
