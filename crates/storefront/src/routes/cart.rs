//! Cart route handlers.
//!
//! The cart lives server-side, one per user, so every route requires a login.
//! Each mutation answers with the full updated cart.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use lumina_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::extract::{Json, Path};
use crate::middleware::RequireAuth;
use crate::models::CartView;
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: u32,
}

/// Show the cart.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<axum::Json<CartView>> {
    let cart = CartService::new(state.pool()).view(user.id).await?;
    Ok(axum::Json(cart))
}

/// Add a product, merging with an existing line.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddToCart>,
) -> Result<axum::Json<CartView>> {
    let cart = CartService::new(state.pool())
        .add(user.id, body.product_id, body.quantity)
        .await?;

    let product_id = body.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
    Ok(axum::Json(cart))
}

/// Set a line's quantity; zero removes it.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateQuantity>,
) -> Result<axum::Json<CartView>> {
    let cart = CartService::new(state.pool())
        .update(user.id, product_id, body.quantity)
        .await?;
    Ok(axum::Json(cart))
}

/// Remove a line. Removing a product that is not in the cart is a no-op.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<axum::Json<CartView>> {
    let cart = CartService::new(state.pool())
        .remove(user.id, product_id)
        .await?;
    Ok(axum::Json(cart))
}

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    CartService::new(state.pool()).clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
