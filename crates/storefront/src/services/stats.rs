//! Admin dashboard statistics.

use serde::Serialize;
use sqlx::PgPool;

use lumina_core::{Money, OrderStatus};

use crate::db::orders::StatusCount;
use crate::db::products::CategoryCount;
use crate::db::{OrderRepository, ProductRepository, RepositoryError, UserRepository};

/// Store-wide figures for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_orders: i64,
    /// Sum of every order total, whatever its status.
    pub total_revenue: Money,
    /// One entry per status, zero counts included.
    pub orders_by_status: Vec<StatusCount>,
    pub products_by_category: Vec<CategoryCount>,
}

/// Statistics service.
pub struct StatsService<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsService<'a> {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Gather the dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn collect(&self) -> Result<StoreStats, RepositoryError> {
        let products = ProductRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        let total_products = products.count().await?;
        let total_users = UserRepository::new(self.pool).count().await?;
        let (total_orders, total_revenue) = orders.totals().await?;
        let orders_by_status = fill_statuses(orders.count_by_status().await?);
        let products_by_category = products.count_by_category().await?;

        Ok(StoreStats {
            total_products,
            total_users,
            total_orders,
            total_revenue,
            orders_by_status,
            products_by_category,
        })
    }
}

/// Expand per-status counts to every status, in lifecycle order.
fn fill_statuses(counts: Vec<StatusCount>) -> Vec<StatusCount> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: counts
                .iter()
                .find(|c| c.status == status)
                .map_or(0, |c| c.count),
        })
        .collect()
}
