//! Per-product rentability reporting.
//!
//! For every active product: revenue is the sum of its sale prices, cost is
//! the latest price point's unit cost (base plus shipment) times units sold,
//! and the percentage is profit over cost. A product with no price point
//! reports zero cost, profit, and percentage no matter how much it sold.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use tradepost_core::ProductId;

use crate::db::{FinancialsRepository, RepositoryError};

/// One product's rentability figures.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRentability {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub units_sold: i64,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub rentability_percentage: Decimal,
}

/// Derive cost, profit, and percentage for one product.
///
/// `unit_cost` is the latest price point's `base_cost + shipment_cost`, or
/// `None` when the product has no price point at all.
#[must_use]
pub fn compute_metrics(
    units_sold: i64,
    total_revenue: Decimal,
    unit_cost: Option<Decimal>,
) -> (Decimal, Decimal, Decimal) {
    let Some(unit_cost) = unit_cost else {
        // No price point: all-zero metrics regardless of sales.
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    };

    let total_cost = unit_cost * Decimal::from(units_sold);
    let total_profit = total_revenue - total_cost;
    let percentage = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        total_profit / total_cost * Decimal::ONE_HUNDRED
    };

    (total_cost, total_profit, percentage)
}

/// Build the rentability report over every active product.
///
/// # Errors
///
/// Returns [`RepositoryError`] when the aggregate query fails.
pub async fn report(pool: &PgPool) -> Result<Vec<ProductRentability>, RepositoryError> {
    let rows = FinancialsRepository::new(pool).rentability_rows().await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let unit_cost = match (row.base_cost, row.shipment_cost) {
                (Some(base), shipment) => Some(base + shipment.unwrap_or_default()),
                (None, _) => None,
            };
            let (total_cost, total_profit, rentability_percentage) =
                compute_metrics(row.units_sold, row.total_revenue, unit_cost);

            ProductRentability {
                product_id: row.product_id,
                sku: row.sku,
                name: row.name,
                units_sold: row.units_sold,
                total_revenue: row.total_revenue,
                total_cost,
                total_profit,
                rentability_percentage,
            }
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_price_point_is_all_zero() {
        let (cost, profit, pct) = compute_metrics(7, dec("350.00"), None);
        assert_eq!(cost, Decimal::ZERO);
        assert_eq!(profit, Decimal::ZERO);
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn test_profit_and_percentage() {
        // 4 units at 25.00 unit cost, 200.00 revenue: 100% rentability.
        let (cost, profit, pct) = compute_metrics(4, dec("200.00"), Some(dec("25.00")));
        assert_eq!(cost, dec("100.00"));
        assert_eq!(profit, dec("100.00"));
        assert_eq!(pct, dec("100.00"));
    }

    #[test]
    fn test_zero_cost_guards_division() {
        // Free-to-acquire product: percentage stays zero instead of dividing
        // by zero.
        let (cost, profit, pct) = compute_metrics(3, dec("30.00"), Some(Decimal::ZERO));
        assert_eq!(cost, Decimal::ZERO);
        assert_eq!(profit, dec("30.00"));
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn test_losing_product_has_negative_percentage() {
        let (cost, profit, pct) = compute_metrics(2, dec("10.00"), Some(dec("10.00")));
        assert_eq!(cost, dec("20.00"));
        assert_eq!(profit, dec("-10.00"));
        assert_eq!(pct, dec("-50.00"));
    }

    #[test]
    fn test_no_sales_with_price_point() {
        let (cost, profit, pct) = compute_metrics(0, Decimal::ZERO, Some(dec("12.00")));
        assert_eq!(cost, Decimal::ZERO);
        assert_eq!(profit, Decimal::ZERO);
        assert_eq!(pct, Decimal::ZERO);
    }
}
