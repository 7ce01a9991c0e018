//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{OrderId, OrderItemId, OrderStatus, ProductId};

/// An order header. Totals are computed server-side from the line items.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub order_id: OrderId,
    /// Generated, unique (`ORD-<year>-<seq>`).
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item on an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One requested line on a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Input for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    /// At least one line item.
    pub items: Vec<CreateOrderItemInput>,
    /// Defaults to 0.
    pub shipping_cost: Option<Decimal>,
    /// Defaults to 0.
    pub tax_amount: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input for updating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderInput {
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}
