//! Customer order route handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use lumina_core::OrderId;

use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAuth;
use crate::models::{CheckoutRequest, Order, ValidationErrors};
use crate::services::OrderService;
use crate::state::AppState;

/// The user's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<axum::Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).orders_for(user.id).await?;
    Ok(axum::Json(orders))
}

/// One of the user's orders. Other users' orders are reported as missing.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<axum::Json<Order>> {
    let order = OrderService::new(state.pool())
        .order_for(user.id, id)
        .await?;
    Ok(axum::Json(order))
}

/// Check out the cart.
#[instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    let address = request
        .shipping_address
        .ok_or_else(|| {
            AppError::Validation(ValidationErrors::single(
                "shippingAddress",
                "Shipping address is required",
            ))
        })?
        .validate()?;

    let order = OrderService::new(state.pool())
        .checkout(&user, &address)
        .await?;
    Ok((StatusCode::CREATED, axum::Json(order)))
}
