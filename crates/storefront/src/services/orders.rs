//! Checkout and order queries.

use sqlx::PgPool;
use thiserror::Error;

use lumina_core::{
    CartLines, Money, MoneyError, OrderId, OrderStatus, PricedLine, UserId, order_total,
};

use crate::db::orders::NewOrder;
use crate::db::{CartRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::models::order::{Order, OrderItem, ShippingAddress};
use crate::models::product::Product;
use crate::models::user::User;

/// Errors from checkout and order management.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing purchasable in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// These products can no longer be bought.
    #[error("out of stock: {}", .0.join(", "))]
    OutOfStock(Vec<String>),

    /// No such order (or not the caller's).
    #[error("order not found")]
    OrderNotFound,

    /// The order total exceeds the storable maximum.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Turn the user's cart into a pending order and empty the cart.
    ///
    /// Runs in one transaction with the cart row locked. Lines for deleted
    /// products are dropped; each remaining product is copied into the
    /// order as it is right now.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if nothing purchasable remains and `OutOfStock`
    /// naming every unavailable product. The cart is untouched on error.
    pub async fn checkout(
        &self,
        user: &User,
        shipping_address: &ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines = CartRepository::lock(&mut *tx, user.id).await?;
        let products = ProductRepository::get_many_in(&mut *tx, &lines.product_ids()).await?;

        let (items, total) = snapshot_items(&lines, &products)?;

        let order = OrderRepository::insert(
            &mut *tx,
            &NewOrder {
                user_id: user.id,
                email: user.email.as_str(),
                total,
                shipping_address,
                items: &items,
            },
        )
        .await?;

        CartRepository::store(&mut *tx, user.id, &CartLines::new()).await?;
        tx.commit().await?;

        tracing::info!(order_id = %order.id, user_id = %user.id, total = %order.total, "Order placed");
        Ok(order)
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn orders_for(&self, user_id: UserId) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// One of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order doesn't exist or belongs to someone else.
    pub async fn order_for(&self, user_id: UserId, id: OrderId) -> Result<Order, CheckoutError> {
        self.orders
            .get_for_user(user_id, id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn all_orders(&self) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.orders.list().await?)
    }

    /// Any order by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order doesn't exist.
    pub async fn order(&self, id: OrderId) -> Result<Order, CheckoutError> {
        self.orders
            .get_by_id(id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)
    }

    /// Move an order to `status`. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, CheckoutError> {
        let order = self
            .orders
            .update_status(id, status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CheckoutError::OrderNotFound,
                other => CheckoutError::Repository(other),
            })?;

        tracing::info!(order_id = %id, %status, "Order status updated");
        Ok(order)
    }
}

/// Copy each purchasable cart line into an order item and total them.
///
/// Lines whose product no longer exists are skipped. Each item records the
/// product as it is now along with the price actually charged.
///
/// # Errors
///
/// Returns `OutOfStock` naming every unavailable product, `EmptyCart` if no
/// line is left, and `Money` if a total exceeds [`Money::MAX`].
fn snapshot_items(
    lines: &CartLines,
    products: &[Product],
) -> Result<(Vec<OrderItem>, Money), CheckoutError> {
    let mut items = Vec::with_capacity(lines.len());
    let mut priced = Vec::with_capacity(lines.len());
    let mut out_of_stock = Vec::new();

    for line in lines.lines() {
        let Some(product) = products.iter().find(|p| p.id == line.product_id) else {
            tracing::debug!(product_id = %line.product_id, "Skipping deleted product at checkout");
            continue;
        };
        if !product.in_stock {
            out_of_stock.push(product.name.clone());
            continue;
        }
        let priced_line = PricedLine {
            unit_price: product.effective_price(),
            quantity: line.quantity,
        };
        items.push(OrderItem {
            product_id: product.id,
            quantity: line.quantity,
            unit_price: priced_line.unit_price,
            line_total: priced_line.line_total()?,
            product: product.clone(),
        });
        priced.push(priced_line);
    }

    if !out_of_stock.is_empty() {
        return Err(CheckoutError::OutOfStock(out_of_stock));
    }
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let total = order_total(&priced)?;
    Ok((items, total))
}
