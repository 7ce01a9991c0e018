//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at compile
//! time, so the CLI binary carries everything it needs.

use super::CommandError;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns [`CommandError`] when the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
