//! Seed the catalogue with the sample lighting products.

use lumina_storefront::db::seed::seed_products;

use super::{CliError, connect};

/// Insert the sample catalogue.
///
/// Skips when products already exist unless `force` is set.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(force: bool) -> Result<(), CliError> {
    let pool = connect().await?;

    let inserted = seed_products(&pool, force).await?;
    if inserted == 0 {
        tracing::info!("Products already present; nothing seeded (use --force to add anyway)");
    } else {
        tracing::info!(inserted, "Sample catalogue seeded");
    }
    Ok(())
}
