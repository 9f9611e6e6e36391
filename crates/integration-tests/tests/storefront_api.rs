//! End-to-end tests for the storefront API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The storefront running with the sample catalogue seeded
//!
//! Run with: cargo test -p lumina-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use lumina_integration_tests::{client, json_body, register, unique_username, url};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// First in-stock product from the catalogue.
async fn in_stock_product(client: &reqwest::Client) -> Value {
    let response = client
        .get(url("/api/products?inStock=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products = json_body(response).await;
    products
        .as_array()
        .and_then(|list| list.first().cloned())
        .expect("no in-stock products; start the server with STOREFRONT_SEED_PRODUCTS=true")
}

fn address() -> Value {
    json!({
        "address": "12 Filament Street",
        "city": "Portland",
        "state": "OR",
        "zip": "97201",
        "country": "USA",
    })
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health() {
    let response = client().get(url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = client().get(url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_login_logout() {
    let client = client();
    let (username, user) = register(&client).await;
    assert_eq!(user["username"], username.as_str());
    assert_eq!(user["isAdmin"], false);
    assert!(user.get("password").is_none());

    let response = client.get(url("/api/user")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.post(url("/api/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get(url("/api/user")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(url("/api/login"))
        .json(&json!({"username": username, "password": "wrong-password"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["message"],
        "Invalid username or password"
    );

    let response = client
        .post(url("/api/login"))
        .json(&json!({"username": username, "password": "bright-lights-42"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_duplicate_username_conflicts() {
    let client = client();
    let (username, _) = register(&client).await;

    let response = client
        .post(url("/api/register"))
        .json(&json!({
            "username": username,
            "password": "bright-lights-42",
            "email": format!("other_{}@example.com", unique_username()),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["message"], "Username already exists");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_catalogue_filters() {
    let client = client();

    let response = client
        .get(url("/api/products/categories"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let categories = json_body(response).await;
    let first = categories[0].as_str().unwrap().to_owned();

    let response = client
        .get(url(&format!(
            "/api/products?category={}&sort=price_asc",
            first.to_uppercase()
        )))
        .send()
        .await
        .unwrap();
    let products = json_body(response).await;
    let products = products.as_array().unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p["category"] == first.as_str()));

    let response = client
        .get(url("/api/products/999999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_and_checkout() {
    let client = client();
    register(&client).await;
    let product = in_stock_product(&client).await;
    let product_id = product["id"].as_i64().unwrap();

    // Adding twice merges into one line
    for _ in 0..2 {
        let response = client
            .post(url("/api/cart"))
            .json(&json!({"productId": product_id, "quantity": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let cart = json_body(client.get(url("/api/cart")).send().await.unwrap()).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["itemCount"], 2);

    let response = client
        .put(url(&format!("/api/cart/{product_id}")))
        .json(&json!({"quantity": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(json_body(response).await["itemCount"], 3);

    let response = client
        .post(url("/api/orders"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(url("/api/orders"))
        .json(&json!({"shippingAddress": address()}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = json_body(response).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"][0]["quantity"], 3);
    assert_eq!(order["items"][0]["product"]["id"], product_id);

    let cart = json_body(client.get(url("/api/cart")).send().await.unwrap()).await;
    assert_eq!(cart["itemCount"], 0);
    assert_eq!(cart["subtotal"], "0.00");

    let orders = json_body(client.get(url("/api/orders")).send().await.unwrap()).await;
    assert_eq!(orders[0]["id"], order["id"]);

    // Checking out again with an empty cart fails
    let response = client
        .post(url("/api/orders"))
        .json(&json!({"shippingAddress": address()}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Cart is empty");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_orders_are_private() {
    let alice = client();
    register(&alice).await;
    let product = in_stock_product(&alice).await;
    alice
        .post(url("/api/cart"))
        .json(&json!({"productId": product["id"], "quantity": 1}))
        .send()
        .await
        .unwrap();
    let order = json_body(
        alice
            .post(url("/api/orders"))
            .json(&json!({"shippingAddress": address()}))
            .send()
            .await
            .unwrap(),
    )
    .await;

    let bob = client();
    register(&bob).await;
    let response = bob
        .get(url(&format!("/api/orders/{}", order["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_admin_routes_reject_customers() {
    let client = client();

    let response = client.get(url("/api/admin/stats")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    register(&client).await;
    let response = client.get(url("/api/admin/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["message"], "Not authorized");
}
