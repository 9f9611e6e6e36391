//! Catalogue management.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use lumina_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::extract::{Json, Path};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductInput};
use crate::state::AppState;

/// Create a product.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, axum::Json(product)))
}

/// Replace a product. Omitted `rating`/`ratingCount` keep their stored values.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<axum::Json<Product>> {
    let draft = input.validate()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => other.into(),
        })?;

    tracing::info!(product_id = %id, "Product updated");
    Ok(axum::Json(product))
}

/// Delete a product. Carts referencing it simply stop showing the line;
/// past orders keep their snapshot.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
