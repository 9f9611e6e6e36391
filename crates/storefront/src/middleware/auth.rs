//! Authentication middleware and extractors.
//!
//! The session holds only the user ID. Every extractor reloads the user from
//! the database, so a revoked admin flag or deleted account applies on the
//! very next request.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use lumina_core::UserId;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{User, session_keys};
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// Rejects with 401 when nobody is logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_owned()))
    }
}

/// Extractor that requires a logged-in admin.
///
/// Rejects with 403 both when nobody is logged in and when the user is not
/// an admin, so admin routes never reveal whether a session exists.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_user(parts, state).await? {
            Some(user) if user.is_admin => Ok(Self(user)),
            Some(user) => {
                tracing::warn!(user_id = %user.id, path = %parts.uri.path(), "Non-admin hit admin route");
                Err(AppError::Forbidden("Not authorized".to_owned()))
            }
            None => Err(AppError::Forbidden("Not authorized".to_owned())),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await?))
    }
}

/// Resolve the session's user ID to a user row.
async fn current_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    // Get the session from extensions (set by SessionManagerLayer)
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };

    let Some(user_id) = session
        .get::<UserId>(session_keys::USER_ID)
        .await
        .ok()
        .flatten()
    else {
        return Ok(None);
    };

    let user = AuthService::new(state.pool()).user(user_id).await?;
    if user.is_none() {
        tracing::debug!(%user_id, "Session refers to a deleted user");
    }
    Ok(user)
}

/// Log `user` in on this session.
///
/// The session ID is cycled first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn log_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER_ID, user.id).await?;
    set_sentry_user(&user.id, Some(user.username.as_str()));
    Ok(())
}

/// Log out, deleting the session entirely.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await?;
    clear_sentry_user();
    Ok(())
}
