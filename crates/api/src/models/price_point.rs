//! Price point and price history domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{PriceHistoryId, PricePointId, ProductId};

/// A cost/price record effective over a time range.
///
/// The open price point (no `effective_to`) is the product's current price;
/// creating a new one closes the previous.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PricePoint {
    pub price_point_id: PricePointId,
    pub product_id: ProductId,
    /// Acquisition cost used for cost-of-sales.
    pub base_cost: Decimal,
    pub selling_price: Decimal,
    /// Observed market price, for reference.
    pub market_price: Option<Decimal>,
    /// Shipping cost attributed to each sale of this product.
    pub shipment_cost: Decimal,
    /// ISO 4217 code; stored, never converted.
    pub currency: String,
    pub effective_from: DateTime<Utc>,
    pub effective_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new price point.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePricePointInput {
    pub product_id: ProductId,
    pub base_cost: Decimal,
    pub selling_price: Decimal,
    pub market_price: Option<Decimal>,
    /// Defaults to 0.
    pub shipment_cost: Option<Decimal>,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    /// Defaults to now.
    pub effective_from: Option<DateTime<Utc>>,
    /// Recorded in price history when the selling price changes.
    pub change_reason: Option<String>,
    /// Recorded in price history when the selling price changes.
    pub changed_by: Option<String>,
}

/// An entry in the price change audit trail.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PriceHistoryEntry {
    pub history_id: PriceHistoryId,
    pub product_id: ProductId,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub change_date: DateTime<Utc>,
    pub change_reason: Option<String>,
    pub changed_by: String,
}
