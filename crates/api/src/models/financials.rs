//! Financial metric and profit-and-loss domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradepost_core::{MetricId, StatementId};

/// A manually recorded financial performance snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialMetric {
    pub metric_id: MetricId,
    pub record_date: NaiveDate,
    pub dollar_average: Decimal,
    pub efficiency_over_costs: Option<Decimal>,
    pub efficiency_over_goal: Option<Decimal>,
    pub estimated_revenue: Option<Decimal>,
    pub actual_revenue: Option<Decimal>,
    pub total_net_income: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub reserve_rate: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a financial metric.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFinancialMetricInput {
    pub record_date: NaiveDate,
    pub dollar_average: Decimal,
    pub efficiency_over_costs: Option<Decimal>,
    pub efficiency_over_goal: Option<Decimal>,
    pub estimated_revenue: Option<Decimal>,
    pub actual_revenue: Option<Decimal>,
    pub total_net_income: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub reserve_rate: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
}

/// Date-range filter for listing metrics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Raw monthly sums the statement is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PnlInputs {
    /// Sum of sale prices over the month.
    pub gross_sales: Decimal,
    /// Sum of latest-price-point base costs over the month's sales.
    pub cost_of_sales: Decimal,
    /// Sum of latest-price-point shipment costs over the month's sales.
    pub shipping_expense: Decimal,
    /// Instance base costs purchased in the month, Colombia.
    pub purchases_colombia: Decimal,
    /// Instance base costs purchased in the month, USA.
    pub purchases_usa: Decimal,
    /// Base costs of units on hand (available or reserved) bought before
    /// the month opened.
    pub beginning_inventory_value: Decimal,
}

/// The derived statement lines, ready to upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementLines {
    pub gross_sales: Decimal,
    pub sales_discounts: Decimal,
    pub net_sales: Decimal,
    pub shipping_income: Decimal,
    pub shipping_expense: Decimal,
    pub cost_of_sales: Decimal,
    pub costs_and_expenses: Decimal,
    pub gross_profit: Decimal,
    pub beginning_inventory_value: Decimal,
    pub purchases_colombia: Decimal,
    pub purchases_usa: Decimal,
    pub ending_inventory_value: Decimal,
    pub payroll_payments: Decimal,
    pub net_income_without_operations: Decimal,
    pub income: Decimal,
    pub operating_income: Decimal,
    pub tax_collection: Decimal,
    pub reserve_collection: Decimal,
    pub net_income: Decimal,
}

/// A monthly profit-and-loss statement, one row per month.
///
/// `sales_discounts`, `shipping_income`, `payroll_payments`,
/// `tax_collection`, and `reserve_collection` are carried as zero-valued
/// placeholder lines so the statement keeps its full column set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfitAndLossStatement {
    pub statement_id: StatementId,
    /// First day of the statement month.
    pub month: NaiveDate,
    pub gross_sales: Decimal,
    pub sales_discounts: Decimal,
    pub net_sales: Decimal,
    pub shipping_income: Decimal,
    pub shipping_expense: Decimal,
    pub cost_of_sales: Decimal,
    pub costs_and_expenses: Decimal,
    pub gross_profit: Decimal,
    pub beginning_inventory_value: Decimal,
    pub purchases_colombia: Decimal,
    pub purchases_usa: Decimal,
    pub ending_inventory_value: Decimal,
    pub payroll_payments: Decimal,
    pub net_income_without_operations: Decimal,
    pub income: Decimal,
    pub operating_income: Decimal,
    pub tax_collection: Decimal,
    pub reserve_collection: Decimal,
    pub net_income: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
