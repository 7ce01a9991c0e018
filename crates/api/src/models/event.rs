//! Event and travel expense domain models.
//!
//! Events are trade shows or conventions the shop sells at. The end budget
//! is derived on demand: initial budget plus sales made during the event
//! window, minus travel expenses.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{EventId, ExpenseId, ProductId};

/// A selling event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_budget: Decimal,
    /// Set by the end-budget calculation; null until computed.
    pub end_budget: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventInput {
    pub name: String,
    pub description: Option<String>,
    pub country: String,
    pub start_date: NaiveDate,
    /// Must be after `start_date`.
    pub end_date: NaiveDate,
    /// Must be positive.
    pub initial_budget: Decimal,
}

/// Input for updating an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_budget: Option<Decimal>,
}

/// Sales made for one product during an event's window.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EventProductSummary {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub units_sold: i64,
    pub total_revenue: Decimal,
}

/// A travel expense attached to an event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TravelExpense {
    pub expense_id: ExpenseId,
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a travel expense.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTravelExpenseInput {
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    /// Must be positive.
    pub amount: Decimal,
    pub expense_date: NaiveDate,
}

/// Input for updating a travel expense. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTravelExpenseInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub expense_date: Option<NaiveDate>,
}
