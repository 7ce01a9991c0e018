//! Database seeding command.
//!
//! Inserts a small sample catalog (two categories, three products with
//! inventory, price points, and instances) for local development. Running it
//! against a non-empty catalog is refused rather than duplicating data.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::CommandError;

/// One sample product row.
struct SampleProduct {
    sku: &'static str,
    name: &'static str,
    condition: &'static str,
    base_cost: &'static str,
    selling_price: &'static str,
    location: &'static str,
}

const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        sku: "BOO-d3adb33f",
        name: "Dragon Vault Booster Box",
        condition: "Mint",
        base_cost: "85.00",
        selling_price: "129.99",
        location: "Colombia",
    },
    SampleProduct {
        sku: "SIN-0ddba11s",
        name: "Ancient Tome (Foil)",
        condition: "Near Mint",
        base_cost: "14.50",
        selling_price: "32.00",
        location: "USA",
    },
    SampleProduct {
        sku: "SIN-cafef00d",
        name: "River Serpent",
        condition: "Lightly Played",
        base_cost: "2.25",
        selling_price: "6.50",
        location: "Colombia",
    },
];

/// Seed the database with sample data.
///
/// # Errors
///
/// Returns [`CommandError`] when the database is unreachable or already
/// contains products.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::warn!(existing, "catalog is not empty, refusing to seed");
        return Ok(());
    }

    let boxes = insert_category(&pool, "Booster Boxes").await?;
    let singles = insert_category(&pool, "Singles").await?;

    for (i, sample) in SAMPLE_PRODUCTS.iter().enumerate() {
        let category_id = if i == 0 { boxes } else { singles };
        insert_product(&pool, category_id, sample).await?;
    }

    tracing::info!("Seed complete: 2 categories, {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}

async fn insert_category(pool: &PgPool, name: &str) -> Result<i32, CommandError> {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO product_categories (category_name) VALUES ($1) RETURNING category_id",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn insert_product(
    pool: &PgPool,
    category_id: i32,
    sample: &SampleProduct,
) -> Result<(), CommandError> {
    let base_cost: Decimal = sample.base_cost.parse().unwrap_or_default();
    let selling_price: Decimal = sample.selling_price.parse().unwrap_or_default();

    let mut tx = pool.begin().await?;

    let product_id: i32 = sqlx::query_scalar(
        "INSERT INTO products (sku, category_id, name, condition, location, purchase_date)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING product_id",
    )
    .bind(sample.sku)
    .bind(category_id)
    .bind(sample.name)
    .bind(sample.condition)
    .bind(sample.location)
    .bind(Utc::now().date_naive())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO inventory (product_id, quantity, available_quantity)
         VALUES ($1, 1, 1)",
    )
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO price_points (product_id, base_cost, selling_price)
         VALUES ($1, $2, $3)",
    )
    .bind(product_id)
    .bind(base_cost)
    .bind(selling_price)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO product_instances (product_id, base_cost, purchase_date, location)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(product_id)
    .bind(base_cost)
    .bind(Utc::now().date_naive())
    .bind(sample.location)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
