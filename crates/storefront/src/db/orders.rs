//! Order repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use lumina_core::{Money, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, ShippingAddress};

const ORDER_COLUMNS: &str =
    "id, user_id, email, total, status, shipping_address, items, created_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: Option<UserId>,
    email: String,
    total: Money,
    status: OrderStatus,
    shipping_address: Json<ShippingAddress>,
    items: Json<Vec<OrderItem>>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            total: row.total,
            status: row.status,
            shipping_address: row.shipping_address.0,
            items: row.items.0,
            created_at: row.created_at,
        }
    }
}

/// Fields for a new order row. Status always starts as `pending`.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub email: &'a str,
    pub total: Money,
    pub shipping_address: &'a ShippingAddress,
    pub items: &'a [OrderItem],
}

/// Orders per status, for the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order on an existing transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(conn: &mut PgConnection, new: &NewOrder<'_>) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(&format!(
            r"
            INSERT INTO orders (user_id, email, total, status, shipping_address, items)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new.user_id)
        .bind(new.email)
        .bind(new.total)
        .bind(OrderStatus::Pending)
        .bind(Json(new.shipping_address))
        .bind(Json(new.items))
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// One of a user's orders. Orders belonging to someone else are `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Order::from))
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::from).ok_or(RepositoryError::NotFound)
    }

    /// Number of orders and the sum of their totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn totals(&self) -> Result<(i64, Money), RepositoryError> {
        let (count, revenue): (i64, Money) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(total), 0)::NUMERIC(14, 2) FROM orders")
                .fetch_one(self.pool)
                .await?;
        Ok((count, revenue))
    }

    /// Order count per status, in lifecycle order. Statuses with no orders are omitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self) -> Result<Vec<StatusCount>, RepositoryError> {
        let rows = sqlx::query_as(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
