//! Integration tests for the Lumina storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate, then start the server with the sample catalogue
//! cargo run -p lumina-cli -- migrate
//! STOREFRONT_SEED_PRODUCTS=true cargo run -p lumina-storefront
//!
//! # Run the ignored tests against it
//! cargo test -p lumina-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_TEST_URL` overrides the server address
//! (default `http://localhost:5000`).

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Absolute URL for an API path such as `/api/cart`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A username no other test run has used.
#[must_use]
pub fn unique_username() -> String {
    let id: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
    format!("test_{id}")
}

/// Register a fresh account on `client`, leaving it logged in.
///
/// Returns the username and the user JSON.
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn register(client: &Client) -> (String, Value) {
    let username = unique_username();
    let response = client
        .post(url("/api/register"))
        .json(&json!({
            "username": username,
            "password": "bright-lights-42",
            "email": format!("{username}@example.com"),
            "firstName": "Test",
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(response.status(), StatusCode::CREATED);
    let user = response.json().await.expect("Invalid user JSON");
    (username, user)
}

/// Read a JSON response body.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(response: Response) -> Value {
    response.json().await.expect("Response body is not JSON")
}
