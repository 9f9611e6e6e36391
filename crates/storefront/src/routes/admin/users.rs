//! User management.

use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use lumina_core::UserId;

use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Admin flag update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFlag {
    pub is_admin: bool,
}

/// Every user, without password hashes.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<axum::Json<Vec<User>>> {
    let users = AuthService::new(state.pool()).users().await?;
    Ok(axum::Json(users))
}

/// Grant or revoke admin access. Admins cannot demote themselves, so the
/// store always keeps at least the acting admin.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<AdminFlag>,
) -> Result<axum::Json<User>> {
    if id == admin.id && !body.is_admin {
        return Err(AppError::BadRequest(
            "Cannot remove your own admin access".to_owned(),
        ));
    }

    let user = AuthService::new(state.pool())
        .set_admin(id, body.is_admin)
        .await?;
    Ok(axum::Json(user))
}
