//! Supplier domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{DebtorType, Email, ProductId, SupplierId, SupplierProductId};

/// A supplier the shop buys from.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub debtor_type: DebtorType,
    pub contact_person: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub debtor_type: DebtorType,
    pub contact_person: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Decimal>,
}

/// Input for updating a supplier. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub debtor_type: Option<DebtorType>,
    pub contact_person: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub payment_terms: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// A product offered by a supplier, with supplier-specific terms.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SupplierProduct {
    pub supplier_product_id: SupplierProductId,
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    /// The supplier's own SKU for the product.
    pub supplier_sku: Option<String>,
    pub supplier_price: Decimal,
    pub lead_time_days: Option<i32>,
    pub minimum_order_quantity: i32,
    pub is_preferred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for linking a product to a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkSupplierProductInput {
    pub product_id: ProductId,
    pub supplier_sku: Option<String>,
    pub supplier_price: Decimal,
    pub lead_time_days: Option<i32>,
    /// Defaults to 1.
    pub minimum_order_quantity: Option<i32>,
    pub is_preferred: Option<bool>,
}
