//! Lumina Core - Shared domain types.
//!
//! This crate provides the types shared by every Lumina component:
//! - `storefront` - JSON API serving the lighting shop
//! - `cli` - Command-line tools for migrations, seeding, and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Cart merging and order totals live here so they can be
//! tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, usernames, money, order status
//! - [`cart`] - Cart line arithmetic and order totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartError, CartLine, CartLines, MAX_LINE_QUANTITY, PricedLine, order_total};
pub use types::*;
