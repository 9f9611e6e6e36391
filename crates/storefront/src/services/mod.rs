//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login and admin flag management
//! - `cart` - Per-user cart backed by the `carts` table
//! - `orders` - Checkout and order queries
//! - `stats` - Admin dashboard figures
//!
//! Services borrow the pool and wrap one or more repositories; handlers
//! construct them per request.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod stats;

pub use auth::{AuthError, AuthService};
pub use cart::{CartService, CartServiceError};
pub use orders::{CheckoutError, OrderService};
pub use stats::{StatsService, StoreStats};
