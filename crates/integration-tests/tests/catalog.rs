//! Integration tests for the catalog: categories, products, price points.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p tradepost-api)
//!
//! Run with: cargo test -p tradepost-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use tradepost_integration_tests::api_base_url;

/// Test helper: create a category and return its id.
async fn create_category(client: &Client, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/categories", api_base_url()))
        .json(&json!({ "category_name": name }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse category");
    body["category_id"].as_i64().expect("category_id")
}

/// Test helper: create a product in a category and return its JSON.
async fn create_product(client: &Client, category_id: i64, name: &str) -> Value {
    let resp = client
        .post(format!("{}/products", api_base_url()))
        .json(&json!({
            "category_id": category_id,
            "name": name,
            "condition": "Near Mint",
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_crud_roundtrip() {
    let client = Client::new();
    let base_url = api_base_url();

    let id = create_category(&client, "Integration Categories").await;

    // Fetch it back
    let resp = client
        .get(format!("{base_url}/categories/{id}"))
        .send()
        .await
        .expect("Failed to get category");
    assert_eq!(resp.status(), StatusCode::OK);

    // Rename
    let resp = client
        .patch(format!("{base_url}/categories/{id}"))
        .json(&json!({ "category_name": "Renamed" }))
        .send()
        .await
        .expect("Failed to patch category");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("parse");
    assert_eq!(body["category_name"], "Renamed");

    // Delete
    let resp = client
        .delete(format!("{base_url}/categories/{id}"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{base_url}/categories/{id}"))
        .send()
        .await
        .expect("Failed to re-get category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_gets_generated_sku_and_inventory() {
    let client = Client::new();
    let base_url = api_base_url();

    let category_id = create_category(&client, "Sku Generation").await;
    let product = create_product(&client, category_id, "Generated Sku Product").await;

    // SKU was generated from the category name prefix
    let sku = product["sku"].as_str().expect("sku");
    assert!(sku.starts_with("SKU") || sku.contains('-'), "sku = {sku}");

    // The inventory row exists from the moment the product does
    let product_id = product["product_id"].as_i64().expect("product_id");
    let resp = client
        .get(format!("{base_url}/inventory/{product_id}"))
        .send()
        .await
        .expect("Failed to get inventory");
    assert_eq!(resp.status(), StatusCode::OK);
    let inventory: Value = resp.json().await.expect("parse inventory");
    assert_eq!(inventory["quantity"], 0);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_sku_conflicts() {
    let client = Client::new();
    let base_url = api_base_url();

    let category_id = create_category(&client, "Duplicate Skus").await;
    let body = json!({
        "category_id": category_id,
        "name": "First",
        "condition": "Mint",
        "sku": "DUP-INTEG-001",
    });

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&body)
        .send()
        .await
        .expect("create first");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&body)
        .send()
        .await
        .expect("create duplicate");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_price_point_rollover_writes_history() {
    let client = Client::new();
    let base_url = api_base_url();

    let category_id = create_category(&client, "Pricing").await;
    let product = create_product(&client, category_id, "Repriced Product").await;
    let product_id = product["product_id"].as_i64().expect("product_id");

    for (base, sell) in [("10.00", "20.00"), ("10.00", "25.00")] {
        let resp = client
            .post(format!("{base_url}/price-points"))
            .json(&json!({
                "product_id": product_id,
                "base_cost": base,
                "selling_price": sell,
                "changed_by": "integration-test",
            }))
            .send()
            .await
            .expect("create price point");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // Two price points, the older one closed
    let resp = client
        .get(format!("{base_url}/price-points?product_id={product_id}"))
        .send()
        .await
        .expect("list price points");
    let points: Vec<Value> = resp.json().await.expect("parse price points");
    assert_eq!(points.len(), 2);
    assert!(points[0]["effective_to"].is_null());
    assert!(!points[1]["effective_to"].is_null());

    // The selling-price change landed in history
    let resp = client
        .get(format!("{base_url}/products/{product_id}/price-history"))
        .send()
        .await
        .expect("price history");
    let history: Vec<Value> = resp.json().await.expect("parse history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["old_price"], "20.00");
    assert_eq!(history[0]["new_price"], "25.00");
}
