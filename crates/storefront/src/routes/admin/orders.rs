//! Order management.

use axum::extract::State;
use tracing::instrument;

use lumina_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::{Order, StatusUpdate, ValidationErrors};
use crate::services::OrderService;
use crate::state::AppState;

/// Every order, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<axum::Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).all_orders().await?;
    Ok(axum::Json(orders))
}

/// Any order by ID.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<axum::Json<Order>> {
    let order = OrderService::new(state.pool()).order(id).await?;
    Ok(axum::Json(order))
}

/// Change an order's status.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusUpdate>,
) -> Result<axum::Json<Order>> {
    let status = parse_status(body.status.as_deref())?;
    let order = OrderService::new(state.pool())
        .update_status(id, status)
        .await?;
    Ok(axum::Json(order))
}

fn parse_status(raw: Option<&str>) -> Result<OrderStatus> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Status is required".to_owned()))?;
    raw.parse::<OrderStatus>()
        .map_err(|e| AppError::Validation(ValidationErrors::single("status", e.to_string())))
}
