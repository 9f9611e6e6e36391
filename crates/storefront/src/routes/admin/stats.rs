//! Dashboard statistics.

use axum::extract::State;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{StatsService, StoreStats};
use crate::state::AppState;

/// Store-wide totals for the dashboard.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<axum::Json<StoreStats>> {
    let stats = StatsService::new(state.pool()).collect().await?;
    Ok(axum::Json(stats))
}
