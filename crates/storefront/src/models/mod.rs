//! Domain models for the storefront API.
//!
//! Response types serialize with camelCase keys, matching what the browser
//! client expects. Request types that need checking carry a `validate`
//! method returning [`ValidationErrors`].

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;
pub mod validation;

pub use cart::{CartItem, CartView};
pub use order::{CheckoutRequest, Order, OrderItem, ShippingAddress, StatusUpdate};
pub use product::{Features, Product, ProductDraft, ProductInput, ProductQuery, ProductSort};
pub use session::keys as session_keys;
pub use user::{LoginRequest, RegisterRequest, User};
pub use validation::{FieldError, ValidationErrors};
