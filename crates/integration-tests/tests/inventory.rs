//! Integration tests for inventory movements.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p tradepost-api)
//!
//! Run with: cargo test -p tradepost-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use tradepost_integration_tests::api_base_url;

/// Test helper: create a product and return its inventory row.
async fn product_inventory(client: &Client, name: &str) -> Value {
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/categories"))
        .json(&json!({ "category_name": "Inventory" }))
        .send()
        .await
        .expect("create category");
    let category: Value = resp.json().await.expect("parse category");

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({
            "category_id": category["category_id"],
            "name": name,
            "condition": "Good",
        }))
        .send()
        .await
        .expect("create product");
    let product: Value = resp.json().await.expect("parse product");

    let resp = client
        .get(format!(
            "{base_url}/inventory/{}",
            product["product_id"].as_i64().expect("product_id")
        ))
        .send()
        .await
        .expect("get inventory");
    resp.json().await.expect("parse inventory")
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_restock_then_sale_adjusts_levels() {
    let client = Client::new();
    let base_url = api_base_url();

    let inventory = product_inventory(&client, "Restocked Product").await;
    let inventory_id = inventory["inventory_id"].as_i64().expect("inventory_id");
    let product_id = inventory["product_id"].as_i64().expect("product_id");

    let resp = client
        .post(format!("{base_url}/inventory/transactions"))
        .json(&json!({
            "inventory_id": inventory_id,
            "transaction_type": "restock",
            "quantity": 5,
            "created_by": "integration-test",
        }))
        .send()
        .await
        .expect("restock");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/inventory/transactions"))
        .json(&json!({
            "inventory_id": inventory_id,
            "transaction_type": "sale",
            "quantity": 2,
            "created_by": "integration-test",
        }))
        .send()
        .await
        .expect("sale movement");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base_url}/inventory/{product_id}"))
        .send()
        .await
        .expect("get inventory");
    let levels: Value = resp.json().await.expect("parse inventory");
    assert_eq!(levels["quantity"], 3);
    assert_eq!(levels["available_quantity"], 3);
    assert!(levels["last_restock_date"].is_string());

    // Both movements are on the audit trail
    let resp = client
        .get(format!("{base_url}/inventory/{product_id}/transactions"))
        .send()
        .await
        .expect("audit trail");
    let trail: Vec<Value> = resp.json().await.expect("parse trail");
    assert_eq!(trail.len(), 2);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_overdrawn_sale_is_rejected() {
    let client = Client::new();
    let base_url = api_base_url();

    let inventory = product_inventory(&client, "Empty Shelf Product").await;
    let inventory_id = inventory["inventory_id"].as_i64().expect("inventory_id");

    // Nothing in stock; selling must be refused
    let resp = client
        .post(format!("{base_url}/inventory/transactions"))
        .json(&json!({
            "inventory_id": inventory_id,
            "transaction_type": "sale",
            "quantity": 1,
            "created_by": "integration-test",
        }))
        .send()
        .await
        .expect("overdrawn sale");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_reserve_moves_available_to_reserved() {
    let client = Client::new();
    let base_url = api_base_url();

    let inventory = product_inventory(&client, "Reserved Product").await;
    let inventory_id = inventory["inventory_id"].as_i64().expect("inventory_id");
    let product_id = inventory["product_id"].as_i64().expect("product_id");

    for (tx_type, qty) in [("restock", 4), ("reserve", 3)] {
        let resp = client
            .post(format!("{base_url}/inventory/transactions"))
            .json(&json!({
                "inventory_id": inventory_id,
                "transaction_type": tx_type,
                "quantity": qty,
                "created_by": "integration-test",
            }))
            .send()
            .await
            .expect("movement");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{base_url}/inventory/{product_id}"))
        .send()
        .await
        .expect("get inventory");
    let levels: Value = resp.json().await.expect("parse inventory");
    assert_eq!(levels["quantity"], 4);
    assert_eq!(levels["available_quantity"], 1);
    assert_eq!(levels["reserved_quantity"], 3);
}
