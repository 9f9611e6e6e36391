//! Cart repository for database operations.
//!
//! A cart row holds only `[{"productId", "quantity"}]`; product data is
//! joined in by the cart service when the cart is read.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use lumina_core::{CartLine, CartLines, UserId};

use super::RepositoryError;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's cart lines. A user without a cart row has an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, user_id: UserId) -> Result<CartLines, RepositoryError> {
        let row: Option<(Json<Vec<CartLine>>,)> =
            sqlx::query_as("SELECT items FROM carts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map_or_else(CartLines::new, |(Json(lines),)| {
            CartLines::from_stored(lines)
        }))
    }

    /// Lock a user's cart row for the rest of the transaction and return
    /// its lines, creating an empty cart first if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn lock(conn: &mut PgConnection, user_id: UserId) -> Result<CartLines, RepositoryError> {
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let (Json(lines),): (Json<Vec<CartLine>>,) =
            sqlx::query_as("SELECT items FROM carts WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(CartLines::from_stored(lines))
    }

    /// Overwrite a user's cart lines. The row must already exist (see [`lock`](Self::lock)).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn store(
        conn: &mut PgConnection,
        user_id: UserId,
        lines: &CartLines,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET items = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(Json(lines))
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Empty a user's cart, keeping the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::store(&mut *conn, user_id, &CartLines::new()).await
    }
}
