//! Lumina storefront library.
//!
//! JSON API for the Lumina lighting store: catalogue, per-user carts,
//! checkout, orders, and the admin back office. Exposed as a library so the
//! binary, the CLI, and tests share one router and one set of services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
