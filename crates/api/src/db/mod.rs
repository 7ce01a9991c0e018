//! Database operations for the Tradepost `PostgreSQL` schema.
//!
//! Each repository is a thin struct over a borrowed [`PgPool`]. Queries use
//! the runtime-checked sqlx API so the workspace builds without a live
//! database; the schema they target lives in `migrations/`.
//!
//! Multi-statement writes (product + inventory row, price point rollover,
//! sale + instance + stock movement, order + items) run inside a single SQL
//! transaction: the request either commits all of it or none of it.

pub mod categories;
pub mod events;
pub mod financials;
pub mod images;
pub mod instances;
pub mod inventory;
pub mod orders;
pub mod price_points;
pub mod products;
pub mod sales;
pub mod suppliers;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use events::{EventRepository, TravelExpenseRepository};
pub use financials::FinancialsRepository;
pub use images::ImageRepository;
pub use instances::InstanceRepository;
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;
pub use price_points::PricePointRepository;
pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use suppliers::SupplierRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Input rejected before touching the database (e.g., a stock movement
    /// that would drive a counter negative).
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl RepositoryError {
    /// Map a sqlx error to [`Self::Invalid`] when it is any foreign-key
    /// violation, and to [`Self::Database`] otherwise. Used where the only
    /// FK on the statement is the one being validated.
    pub(crate) fn from_foreign_key(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_foreign_key_violation()
        {
            return Self::Invalid(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
