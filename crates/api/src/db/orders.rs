//! Database operations for orders and their line items.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use tradepost_core::OrderId;

use super::RepositoryError;
use crate::models::order::{
    CreateOrderInput, Order, OrderItem, OrderWithItems, UpdateOrderInput,
};

const ORDER_COLUMNS: &str = "order_id, order_number, order_date, status, subtotal, \
     shipping_cost, tax_amount, total_amount, currency, notes, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "order_item_id, order_id, product_id, quantity, unit_price, subtotal, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its line items in one transaction.
    ///
    /// Totals are computed from the items; the order number is derived from
    /// the assigned order id (`ORD-<year>-<padded id>`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` when there are no items, an item
    /// is malformed, or a product does not exist.
    pub async fn create(&self, input: &CreateOrderInput) -> Result<OrderWithItems, RepositoryError> {
        if input.items.is_empty() {
            return Err(RepositoryError::Invalid(
                "order must have at least one item".to_owned(),
            ));
        }
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(RepositoryError::Invalid(
                    "item quantity must be positive".to_owned(),
                ));
            }
            if item.unit_price.is_sign_negative() {
                return Err(RepositoryError::Invalid(
                    "item unit_price must be non-negative".to_owned(),
                ));
            }
        }

        let subtotal: Decimal = input
            .items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum();
        let shipping_cost = input.shipping_cost.unwrap_or_default();
        let tax_amount = input.tax_amount.unwrap_or_default();
        let total_amount = subtotal + shipping_cost + tax_amount;

        let mut tx = self.pool.begin().await?;

        // Inserted with a placeholder number, then renumbered from the
        // assigned id so order numbers stay dense and unique.
        let placeholder = format!("PENDING-{}", Uuid::new_v4().simple());
        let sql = format!(
            "INSERT INTO orders
                 (order_number, status, subtotal, shipping_cost, tax_amount, total_amount, notes)
             VALUES ($1, 'pending', $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(&placeholder)
            .bind(subtotal)
            .bind(shipping_cost)
            .bind(tax_amount)
            .bind(total_amount)
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let sql = format!(
            "UPDATE orders
             SET order_number = 'ORD-' || to_char(order_date, 'YYYY') || '-' ||
                                lpad(order_id::text, 5, '0')
             WHERE order_id = $1
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order.order_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let line_subtotal = item.unit_price * Decimal::from(item.quantity);
            let sql = format!(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {ITEM_COLUMNS}"
            );
            let inserted = sqlx::query_as::<_, OrderItem>(&sql)
                .bind(order.order_id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .bind(line_subtotal)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    RepositoryError::from_foreign_key(
                        e,
                        &format!("product {} does not exist", item.product_id),
                    )
                })?;
            items.push(inserted);
        }

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    /// List orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC, order_id DESC"
        );
        let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1");
        let Some(order) = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY order_item_id"
        );
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(id)
            .fetch_all(self.pool)
            .await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// Update an order's status and/or notes.
    ///
    /// Terminal statuses (`completed`, `cancelled`) cannot transition
    /// further.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist,
    /// `RepositoryError::Conflict` for a transition out of a terminal
    /// status.
    pub async fn update(
        &self,
        id: OrderId,
        input: &UpdateOrderInput,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if let Some(next) = input.status
            && current.status.is_terminal()
            && next != current.status
        {
            return Err(RepositoryError::Conflict(format!(
                "order is already {}",
                current.status
            )));
        }

        let sql = format!(
            "UPDATE orders
             SET status = COALESCE($2, status),
                 notes = COALESCE($3, notes)
             WHERE order_id = $1
             RETURNING {ORDER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
