//! User account management commands.
//!
//! Accounts go through the same validation and Argon2id hashing as web
//! registration.

use lumina_storefront::models::RegisterRequest;
use lumina_storefront::services::AuthService;

use super::{CliError, connect};

/// Create a user, optionally with admin access.
///
/// # Errors
///
/// Returns an error if a field is invalid, the username or email is taken,
/// or the database is unreachable.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> Result<(), CliError> {
    let pool = connect().await?;

    let request = RegisterRequest {
        username: username.to_owned(),
        password: password.to_owned(),
        email: email.to_owned(),
        first_name: None,
        last_name: None,
    };
    let user = AuthService::new(&pool).create_user(&request, admin).await?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        is_admin = user.is_admin,
        "User created"
    );
    Ok(())
}

/// Grant or revoke admin access by username.
///
/// # Errors
///
/// Returns an error if no user has that name or the database is unreachable.
pub async fn set_admin(username: &str, is_admin: bool) -> Result<(), CliError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .set_admin_by_username(username, is_admin)
        .await?;

    tracing::info!(username = %user.username, is_admin = user.is_admin, "Admin access updated");
    Ok(())
}
