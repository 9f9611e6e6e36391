//! Catalogue route handlers (public).

use axum::extract::State;
use lumina_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, Query};
use crate::models::{Product, ProductQuery};
use crate::state::AppState;

/// Product listing with optional filters and sort order.
///
/// `GET /api/products?category=Chandeliers&featured=true&inStock=true&sort=price_asc`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<axum::Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(&query).await?;
    Ok(axum::Json(products))
}

/// Distinct category names, alphabetical.
pub async fn categories(State(state): State<AppState>) -> Result<axum::Json<Vec<String>>> {
    let categories = ProductRepository::new(state.pool()).categories().await?;
    Ok(axum::Json(categories))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<axum::Json<Product>> {
    ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(axum::Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))
}
