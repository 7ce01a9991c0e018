//! Database operations for financial metrics and profit-and-loss statements.
//!
//! The P&L queries gather raw sums for a month; the arithmetic that turns
//! them into statement lines lives in [`crate::services::profit_and_loss`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::financials::{
    CreateFinancialMetricInput, FinancialMetric, MetricFilter, PnlInputs, ProfitAndLossStatement,
    StatementLines,
};

const METRIC_COLUMNS: &str = "metric_id, record_date, dollar_average, efficiency_over_costs, \
     efficiency_over_goal, estimated_revenue, actual_revenue, total_net_income, tax_rate, \
     reserve_rate, profit_margin, created_at";

const STATEMENT_COLUMNS: &str = "statement_id, month, gross_sales, sales_discounts, net_sales, \
     shipping_income, shipping_expense, cost_of_sales, costs_and_expenses, gross_profit, \
     beginning_inventory_value, purchases_colombia, purchases_usa, ending_inventory_value, \
     payroll_payments, net_income_without_operations, income, operating_income, tax_collection, \
     reserve_collection, net_income, created_at, updated_at";

/// Raw monthly sums pulled for the P&L computation.
#[derive(Debug, sqlx::FromRow)]
struct SalesTotalsRow {
    gross_sales: Decimal,
    cost_of_sales: Decimal,
    shipping_expense: Decimal,
}

/// Per-product aggregates feeding the rentability report.
#[derive(Debug, sqlx::FromRow)]
pub struct RentabilityRow {
    pub product_id: tradepost_core::ProductId,
    pub sku: String,
    pub name: String,
    pub units_sold: i64,
    pub total_revenue: Decimal,
    /// Latest price point's base cost; absent when the product has none.
    pub base_cost: Option<Decimal>,
    /// Latest price point's shipment cost; absent when the product has none.
    pub shipment_cost: Option<Decimal>,
}

/// Repository for financial database operations.
pub struct FinancialsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FinancialsRepository<'a> {
    /// Create a new financials repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Financial metrics
    // =========================================================================

    /// Record a financial metric snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_metric(
        &self,
        input: &CreateFinancialMetricInput,
    ) -> Result<FinancialMetric, RepositoryError> {
        let sql = format!(
            "INSERT INTO financial_metrics
                 (record_date, dollar_average, efficiency_over_costs, efficiency_over_goal,
                  estimated_revenue, actual_revenue, total_net_income, tax_rate, reserve_rate,
                  profit_margin)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {METRIC_COLUMNS}"
        );
        let metric = sqlx::query_as::<_, FinancialMetric>(&sql)
            .bind(input.record_date)
            .bind(input.dollar_average)
            .bind(input.efficiency_over_costs)
            .bind(input.efficiency_over_goal)
            .bind(input.estimated_revenue)
            .bind(input.actual_revenue)
            .bind(input.total_net_income)
            .bind(input.tax_rate)
            .bind(input.reserve_rate)
            .bind(input.profit_margin)
            .fetch_one(self.pool)
            .await?;
        Ok(metric)
    }

    /// List metrics within an optional date range, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_metrics(
        &self,
        filter: &MetricFilter,
    ) -> Result<Vec<FinancialMetric>, RepositoryError> {
        let sql = format!(
            "SELECT {METRIC_COLUMNS} FROM financial_metrics
             WHERE ($1::date IS NULL OR record_date >= $1)
               AND ($2::date IS NULL OR record_date <= $2)
             ORDER BY record_date DESC, metric_id DESC"
        );
        let rows = sqlx::query_as::<_, FinancialMetric>(&sql)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    // =========================================================================
    // Profit & loss
    // =========================================================================

    /// Gather the raw sums for one statement month.
    ///
    /// `month_start` is the first day of the month; `month_end` the first
    /// day of the next month (exclusive bound).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn gather_pnl_inputs(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<PnlInputs, RepositoryError> {
        // Each sale in the month is costed with its product's latest price
        // point; sales without one contribute revenue but no cost.
        let totals = sqlx::query_as::<_, SalesTotalsRow>(
            "SELECT COALESCE(SUM(s.sale_price), 0) AS gross_sales,
                    COALESCE(SUM(pp.base_cost), 0) AS cost_of_sales,
                    COALESCE(SUM(pp.shipment_cost), 0) AS shipping_expense
             FROM sales s
             LEFT JOIN LATERAL (
                 SELECT base_cost, shipment_cost FROM price_points
                 WHERE product_id = s.product_id
                 ORDER BY effective_from DESC, price_point_id DESC
                 LIMIT 1
             ) pp ON TRUE
             WHERE s.sale_date::date >= $1 AND s.sale_date::date < $2",
        )
        .bind(month_start)
        .bind(month_end)
        .fetch_one(self.pool)
        .await?;

        let (purchases_colombia, purchases_usa): (Decimal, Decimal) = sqlx::query_as(
            "SELECT COALESCE(SUM(base_cost) FILTER (WHERE location = 'Colombia'), 0),
                    COALESCE(SUM(base_cost) FILTER (WHERE location = 'USA'), 0)
             FROM product_instances
             WHERE purchase_date >= $1 AND purchase_date < $2",
        )
        .bind(month_start)
        .bind(month_end)
        .fetch_one(self.pool)
        .await?;

        // Units still on hand (available or reserved) bought before the
        // month opened.
        let beginning_inventory_value: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(base_cost), 0) FROM product_instances
             WHERE status IN ('available', 'reserved') AND purchase_date < $1",
        )
        .bind(month_start)
        .fetch_one(self.pool)
        .await?;

        Ok(PnlInputs {
            gross_sales: totals.gross_sales,
            cost_of_sales: totals.cost_of_sales,
            shipping_expense: totals.shipping_expense,
            purchases_colombia,
            purchases_usa,
            beginning_inventory_value,
        })
    }

    /// Upsert the statement for a month; generating the same month twice
    /// updates the existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_statement(
        &self,
        month: NaiveDate,
        lines: &StatementLines,
    ) -> Result<ProfitAndLossStatement, RepositoryError> {
        let sql = format!(
            "INSERT INTO profit_and_loss
                 (month, gross_sales, sales_discounts, net_sales, shipping_income,
                  shipping_expense, cost_of_sales, costs_and_expenses, gross_profit,
                  beginning_inventory_value, purchases_colombia, purchases_usa,
                  ending_inventory_value, payroll_payments, net_income_without_operations,
                  income, operating_income, tax_collection, reserve_collection, net_income)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                     $18, $19, $20)
             ON CONFLICT (month) DO UPDATE SET
                 gross_sales = EXCLUDED.gross_sales,
                 sales_discounts = EXCLUDED.sales_discounts,
                 net_sales = EXCLUDED.net_sales,
                 shipping_income = EXCLUDED.shipping_income,
                 shipping_expense = EXCLUDED.shipping_expense,
                 cost_of_sales = EXCLUDED.cost_of_sales,
                 costs_and_expenses = EXCLUDED.costs_and_expenses,
                 gross_profit = EXCLUDED.gross_profit,
                 beginning_inventory_value = EXCLUDED.beginning_inventory_value,
                 purchases_colombia = EXCLUDED.purchases_colombia,
                 purchases_usa = EXCLUDED.purchases_usa,
                 ending_inventory_value = EXCLUDED.ending_inventory_value,
                 payroll_payments = EXCLUDED.payroll_payments,
                 net_income_without_operations = EXCLUDED.net_income_without_operations,
                 income = EXCLUDED.income,
                 operating_income = EXCLUDED.operating_income,
                 tax_collection = EXCLUDED.tax_collection,
                 reserve_collection = EXCLUDED.reserve_collection,
                 net_income = EXCLUDED.net_income
             RETURNING {STATEMENT_COLUMNS}"
        );
        let statement = sqlx::query_as::<_, ProfitAndLossStatement>(&sql)
            .bind(month)
            .bind(lines.gross_sales)
            .bind(lines.sales_discounts)
            .bind(lines.net_sales)
            .bind(lines.shipping_income)
            .bind(lines.shipping_expense)
            .bind(lines.cost_of_sales)
            .bind(lines.costs_and_expenses)
            .bind(lines.gross_profit)
            .bind(lines.beginning_inventory_value)
            .bind(lines.purchases_colombia)
            .bind(lines.purchases_usa)
            .bind(lines.ending_inventory_value)
            .bind(lines.payroll_payments)
            .bind(lines.net_income_without_operations)
            .bind(lines.income)
            .bind(lines.operating_income)
            .bind(lines.tax_collection)
            .bind(lines.reserve_collection)
            .bind(lines.net_income)
            .fetch_one(self.pool)
            .await?;
        Ok(statement)
    }

    /// List all statements, oldest month first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_statements(&self) -> Result<Vec<ProfitAndLossStatement>, RepositoryError> {
        let sql = format!("SELECT {STATEMENT_COLUMNS} FROM profit_and_loss ORDER BY month");
        let rows = sqlx::query_as::<_, ProfitAndLossStatement>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get the statement for one month.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_statement(
        &self,
        month: NaiveDate,
    ) -> Result<Option<ProfitAndLossStatement>, RepositoryError> {
        let sql = format!("SELECT {STATEMENT_COLUMNS} FROM profit_and_loss WHERE month = $1");
        let row = sqlx::query_as::<_, ProfitAndLossStatement>(&sql)
            .bind(month)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    // =========================================================================
    // Rentability
    // =========================================================================

    /// Per-product sales aggregates joined to the latest price point, for
    /// every active product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rentability_rows(&self) -> Result<Vec<RentabilityRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, RentabilityRow>(
            "SELECT p.product_id, p.sku, p.name,
                    COUNT(s.sale_id)::bigint AS units_sold,
                    COALESCE(SUM(s.sale_price), 0) AS total_revenue,
                    pp.base_cost, pp.shipment_cost
             FROM products p
             LEFT JOIN sales s ON s.product_id = p.product_id
             LEFT JOIN LATERAL (
                 SELECT base_cost, shipment_cost FROM price_points
                 WHERE product_id = p.product_id
                 ORDER BY effective_from DESC, price_point_id DESC
                 LIMIT 1
             ) pp ON TRUE
             WHERE p.is_active = TRUE
             GROUP BY p.product_id, p.sku, p.name, pp.base_cost, pp.shipment_cost
             ORDER BY p.product_id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
