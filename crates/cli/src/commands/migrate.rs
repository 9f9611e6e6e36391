//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the binary at compile time.

use super::{CliError, connect};

/// Apply every pending storefront migration.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
