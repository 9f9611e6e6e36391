//! Cart service.
//!
//! Every mutation runs in a transaction holding the cart row lock, so two
//! concurrent adds from the same user cannot lose an update.

use sqlx::PgPool;
use thiserror::Error;

use lumina_core::{CartError, CartLines, MoneyError, ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::CartView;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The product is not currently sold.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Line arithmetic rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Totals overflowed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CartServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Cart service for one user's cart.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's cart joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if a query fails.
    pub async fn view(&self, user_id: UserId) -> Result<CartView, CartServiceError> {
        let lines = CartRepository::new(self.pool).lines(user_id).await?;
        self.render(&lines).await
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `OutOfStock`, `Cart` for a zero or
    /// oversized quantity, or `Money` if the cart total would exceed
    /// [`Money::MAX`](lumina_core::Money::MAX).
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartServiceError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity.into());
        }
        let product = ProductRepository::new(self.pool)
            .get_by_id(product_id)
            .await?
            .ok_or(CartServiceError::ProductNotFound)?;
        if !product.in_stock {
            return Err(CartServiceError::OutOfStock(product.name));
        }

        let view = self
            .mutate(user_id, |lines| lines.add(product_id, quantity).map(|_| ()))
            .await?;

        tracing::debug!(%user_id, %product_id, quantity, "Added to cart");
        Ok(view)
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `Cart(LineNotFound)` if the product is not in the cart and
    /// `Money` if the new total would exceed the storable maximum.
    pub async fn update(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartServiceError> {
        self.mutate(user_id, |lines| lines.set_quantity(product_id, quantity))
            .await
    }

    /// Remove a product's line. Removing an absent line is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if a query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartView, CartServiceError> {
        self.mutate(user_id, |lines| {
            lines.remove(product_id);
            Ok(())
        })
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Repository` if the update fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartServiceError> {
        CartRepository::new(self.pool).clear(user_id).await?;
        Ok(())
    }

    /// Apply `change` under the cart row lock and persist the result.
    ///
    /// The view is priced before anything is written, so a change whose
    /// totals cannot be stored is rejected like any other invalid change.
    async fn mutate<F>(&self, user_id: UserId, change: F) -> Result<CartView, CartServiceError>
    where
        F: FnOnce(&mut CartLines) -> Result<(), CartError> + Send,
    {
        let mut tx = self.pool.begin().await?;
        let mut lines = CartRepository::lock(&mut *tx, user_id).await?;
        change(&mut lines)?;
        let products = ProductRepository::get_many_in(&mut *tx, &lines.product_ids()).await?;
        let view = CartView::build(&lines, &products)?;
        CartRepository::store(&mut *tx, user_id, &lines).await?;
        tx.commit().await?;
        Ok(view)
    }

    async fn render(&self, lines: &CartLines) -> Result<CartView, CartServiceError> {
        if lines.is_empty() {
            return Ok(CartView::empty());
        }
        let products = ProductRepository::new(self.pool)
            .get_many(&lines.product_ids())
            .await?;
        Ok(CartView::build(lines, &products)?)
    }
}
