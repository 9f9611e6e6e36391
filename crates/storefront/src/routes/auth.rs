//! Authentication route handlers.
//!
//! Username/password accounts backed by the local `users` table. A successful
//! register or login stores the user ID in the session; every later request
//! reloads the user through the auth extractors.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Json;
use crate::middleware::{OptionalAuth, log_in, log_out};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Create an account and log it in.
#[instrument(skip(state, session, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool()).register(&request).await?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, axum::Json(user)))
}

/// Log in with username and password.
#[instrument(skip(state, session, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<axum::Json<User>> {
    let user = AuthService::new(state.pool())
        .login(&request.username, &request.password)
        .await?;
    start_session(&session, &user).await?;

    add_breadcrumb("auth", "Logged in", None);
    Ok(axum::Json(user))
}

/// End the session. Succeeds whether or not anyone was logged in.
pub async fn logout(session: Session) -> Result<StatusCode> {
    log_out(&session).await.map_err(|e| {
        tracing::error!("Failed to flush session: {e}");
        AppError::Internal("session store unavailable".to_owned())
    })?;
    Ok(StatusCode::OK)
}

/// The logged-in user, or 401.
pub async fn current_user(OptionalAuth(user): OptionalAuth) -> Result<axum::Json<User>> {
    user.map(axum::Json)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_owned()))
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    log_in(session, user).await.map_err(|e| {
        tracing::error!(user_id = %user.id, "Failed to write session: {e}");
        AppError::Internal("session store unavailable".to_owned())
    })
}
