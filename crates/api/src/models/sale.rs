//! Sale domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{PaymentMethod, ProductId, SaleId};

/// A completed sale of one product unit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    pub product_id: ProductId,
    pub sale_price: Decimal,
    /// Defaults to now.
    pub sale_date: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Filter criteria for listing sales.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleFilter {
    pub product_id: Option<ProductId>,
    pub payment_method: Option<PaymentMethod>,
    /// Inclusive lower bound on `sale_date`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `sale_date`.
    pub end_date: Option<DateTime<Utc>>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
