//! Admin route handlers.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin), so
//! anonymous and non-admin callers both get 403.

pub mod orders;
pub mod products;
pub mod stats;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the admin routes router (mounted at `/api/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show).put(orders::update_status))
        .route("/users", get(users::index))
        .route("/users/{id}", put(users::update))
        .route("/stats", get(stats::show))
}
