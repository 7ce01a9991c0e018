//! Monthly profit-and-loss statement generation.
//!
//! The statement for a month is derived from four sums: sales revenue,
//! the costs attributed to those sales, instance purchases, and the value
//! of inventory on hand when the month opened. Discounts, shipping income,
//! payroll, tax, and reserve lines are carried as zeros.
//!
//! Ending inventory is `beginning + purchases - cost of sales`, floored at
//! zero: when recorded costs exceed what was ever on the books (sales of
//! products whose instances were never captured), the effective cost of
//! sales is reduced to what the books can support so the statement stays
//! internally consistent and the inventory line never goes negative.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::{FinancialsRepository, RepositoryError};
use crate::models::financials::{PnlInputs, ProfitAndLossStatement, StatementLines};

/// Errors from statement generation.
#[derive(Debug, thiserror::Error)]
pub enum PnlError {
    /// The month string was not `YYYY-MM`.
    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    /// A database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Parse a `YYYY-MM` month into its first day.
///
/// # Errors
///
/// Returns [`PnlError::InvalidMonth`] for anything that is not a valid
/// year-month.
pub fn parse_month(month: &str) -> Result<NaiveDate, PnlError> {
    let invalid = || PnlError::InvalidMonth(month.to_owned());

    let (year, month_num) = month.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month_num.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month_num: u32 = month_num.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month_num, 1).ok_or_else(invalid)
}

/// The first day of the month after `month_start`.
#[must_use]
pub fn next_month(month_start: NaiveDate) -> NaiveDate {
    use chrono::Datelike;

    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    // Day 1 of a valid year/month always exists.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(month_start)
}

/// Derive the statement lines from the gathered sums.
#[must_use]
pub fn build_statement(inputs: &PnlInputs) -> StatementLines {
    let PnlInputs {
        gross_sales,
        cost_of_sales,
        shipping_expense,
        purchases_colombia,
        purchases_usa,
        beginning_inventory_value,
    } = *inputs;

    let sales_discounts = Decimal::ZERO;
    let shipping_income = Decimal::ZERO;
    let payroll_payments = Decimal::ZERO;
    let tax_collection = Decimal::ZERO;
    let reserve_collection = Decimal::ZERO;

    // Floor ending inventory at zero, reducing the effective cost of sales
    // to compensate.
    let on_books = beginning_inventory_value + purchases_colombia + purchases_usa;
    let (cost_of_sales, ending_inventory_value) = if cost_of_sales > on_books {
        (on_books, Decimal::ZERO)
    } else {
        (cost_of_sales, on_books - cost_of_sales)
    };

    let net_sales = gross_sales - sales_discounts;
    let costs_and_expenses = cost_of_sales + shipping_expense;
    let gross_profit = net_sales - costs_and_expenses;
    let income = gross_profit + shipping_income;
    let net_income_without_operations = income - payroll_payments;
    let operating_income = net_income_without_operations;
    let net_income = operating_income - tax_collection - reserve_collection;

    StatementLines {
        gross_sales,
        sales_discounts,
        net_sales,
        shipping_income,
        shipping_expense,
        cost_of_sales,
        costs_and_expenses,
        gross_profit,
        beginning_inventory_value,
        purchases_colombia,
        purchases_usa,
        ending_inventory_value,
        payroll_payments,
        net_income_without_operations,
        income,
        operating_income,
        tax_collection,
        reserve_collection,
        net_income,
    }
}

/// Generate (or regenerate) the statement for a `YYYY-MM` month and upsert
/// it; the same month always lands on the same row.
///
/// # Errors
///
/// Returns [`PnlError::InvalidMonth`] for a malformed month and
/// [`PnlError::Repository`] when a database operation fails.
pub async fn generate(pool: &PgPool, month: &str) -> Result<ProfitAndLossStatement, PnlError> {
    let month_start = parse_month(month)?;
    let month_end = next_month(month_start);

    let repo = FinancialsRepository::new(pool);
    let inputs = repo.gather_pnl_inputs(month_start, month_end).await?;
    let lines = build_statement(&inputs);
    let statement = repo.upsert_statement(month_start, &lines).await?;

    tracing::info!(
        month = %month_start,
        gross_sales = %statement.gross_sales,
        net_income = %statement.net_income,
        "generated profit and loss statement"
    );

    Ok(statement)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_month_valid() {
        assert_eq!(
            parse_month("2026-03").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_month_rejects_garbage() {
        for bad in ["2026", "2026-13", "03-2026", "2026-3", "abcd-ef", "2026-03-01"] {
            assert!(parse_month(bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_next_month_rolls_year() {
        let dec_2025 = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(
            next_month(dec_2025),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        let mar = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(next_month(mar), NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    }

    #[test]
    fn test_zero_sales_month_is_all_zero_profit() {
        let lines = build_statement(&PnlInputs {
            beginning_inventory_value: dec("250.00"),
            ..PnlInputs::default()
        });

        assert_eq!(lines.gross_sales, Decimal::ZERO);
        assert_eq!(lines.gross_profit, Decimal::ZERO);
        assert_eq!(lines.net_income, Decimal::ZERO);
        // Untouched inventory carries through.
        assert_eq!(lines.ending_inventory_value, dec("250.00"));
        assert!(lines.ending_inventory_value >= Decimal::ZERO);
    }

    #[test]
    fn test_statement_arithmetic() {
        let lines = build_statement(&PnlInputs {
            gross_sales: dec("500.00"),
            cost_of_sales: dec("200.00"),
            shipping_expense: dec("30.00"),
            purchases_colombia: dec("120.00"),
            purchases_usa: dec("80.00"),
            beginning_inventory_value: dec("300.00"),
        });

        assert_eq!(lines.net_sales, dec("500.00"));
        assert_eq!(lines.costs_and_expenses, dec("230.00"));
        assert_eq!(lines.gross_profit, dec("270.00"));
        // 300 + 200 - 200
        assert_eq!(lines.ending_inventory_value, dec("300.00"));
        assert_eq!(lines.operating_income, dec("270.00"));
        assert_eq!(lines.net_income, dec("270.00"));
    }

    #[test]
    fn test_ending_inventory_clamped_at_zero() {
        let lines = build_statement(&PnlInputs {
            gross_sales: dec("900.00"),
            cost_of_sales: dec("400.00"),
            shipping_expense: dec("10.00"),
            purchases_colombia: dec("50.00"),
            purchases_usa: Decimal::ZERO,
            beginning_inventory_value: dec("100.00"),
        });

        // Only 150 was ever on the books, so cost of sales drops to 150.
        assert_eq!(lines.ending_inventory_value, Decimal::ZERO);
        assert_eq!(lines.cost_of_sales, dec("150.00"));
        assert_eq!(lines.costs_and_expenses, dec("160.00"));
        assert_eq!(lines.gross_profit, dec("740.00"));
    }

    #[test]
    fn test_placeholder_lines_are_zero() {
        let lines = build_statement(&PnlInputs {
            gross_sales: dec("10.00"),
            ..PnlInputs::default()
        });
        assert_eq!(lines.sales_discounts, Decimal::ZERO);
        assert_eq!(lines.shipping_income, Decimal::ZERO);
        assert_eq!(lines.payroll_payments, Decimal::ZERO);
        assert_eq!(lines.tax_collection, Decimal::ZERO);
        assert_eq!(lines.reserve_collection, Decimal::ZERO);
    }
}
