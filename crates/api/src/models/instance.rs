//! Product instance domain models.
//!
//! An instance is a single physical unit of a product, carrying its own
//! acquisition cost, location, and lifecycle status. Instances drive the
//! purchases and inventory-valuation lines of the P&L statement.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{InstanceId, InstanceStatus, ProductId, StockLocation};

/// A single physical unit of a product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductInstance {
    pub instance_id: InstanceId,
    pub product_id: ProductId,
    /// What this unit cost to acquire.
    pub base_cost: Decimal,
    pub status: InstanceStatus,
    pub purchase_date: NaiveDate,
    pub location: StockLocation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new instance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstanceInput {
    pub product_id: ProductId,
    pub base_cost: Decimal,
    /// Defaults to `available`.
    pub status: Option<InstanceStatus>,
    /// Defaults to today.
    pub purchase_date: Option<NaiveDate>,
    /// Defaults to `Colombia`.
    pub location: Option<StockLocation>,
}

/// Input for updating an instance. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstanceInput {
    pub base_cost: Option<Decimal>,
    pub status: Option<InstanceStatus>,
    pub location: Option<StockLocation>,
}

/// Filter criteria for listing instances.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceFilter {
    pub product_id: Option<ProductId>,
    pub status: Option<InstanceStatus>,
    pub location: Option<StockLocation>,
}
