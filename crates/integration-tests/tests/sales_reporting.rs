//! Integration tests for sales, rentability, and the P&L statement.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p tradepost-api)
//!
//! Run with: cargo test -p tradepost-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use tradepost_integration_tests::api_base_url;

/// Test helper: set up a category + product with a price point, returning
/// the product id.
async fn product_with_price(client: &Client, name: &str, base: &str, sell: &str) -> i64 {
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/categories"))
        .json(&json!({ "category_name": "Reporting" }))
        .send()
        .await
        .expect("create category");
    let category: Value = resp.json().await.expect("parse category");

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({
            "category_id": category["category_id"],
            "name": name,
            "condition": "Mint",
        }))
        .send()
        .await
        .expect("create product");
    let product: Value = resp.json().await.expect("parse product");
    let product_id = product["product_id"].as_i64().expect("product_id");

    let resp = client
        .post(format!("{base_url}/price-points"))
        .json(&json!({
            "product_id": product_id,
            "base_cost": base,
            "selling_price": sell,
            "shipment_cost": "2.00",
        }))
        .send()
        .await
        .expect("create price point");
    assert_eq!(resp.status(), StatusCode::CREATED);

    product_id
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_sale_marks_instance_sold() {
    let client = Client::new();
    let base_url = api_base_url();

    let product_id = product_with_price(&client, "Sold Through Instances", "5.00", "12.00").await;

    let resp = client
        .post(format!("{base_url}/instances"))
        .json(&json!({
            "product_id": product_id,
            "base_cost": "5.00",
            "location": "Colombia",
        }))
        .send()
        .await
        .expect("create instance");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/sales"))
        .json(&json!({
            "product_id": product_id,
            "sale_price": "12.00",
            "payment_method": "Cash",
        }))
        .send()
        .await
        .expect("create sale");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!(
            "{base_url}/instances?product_id={product_id}&status=sold"
        ))
        .send()
        .await
        .expect("list sold instances");
    let sold: Vec<Value> = resp.json().await.expect("parse instances");
    assert_eq!(sold.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_rentability_reports_sold_product() {
    let client = Client::new();
    let base_url = api_base_url();

    let product_id = product_with_price(&client, "Rentable Product", "10.00", "30.00").await;

    let resp = client
        .post(format!("{base_url}/sales"))
        .json(&json!({
            "product_id": product_id,
            "sale_price": "30.00",
            "payment_method": "USD",
        }))
        .send()
        .await
        .expect("create sale");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base_url}/products-with-rentability"))
        .send()
        .await
        .expect("rentability report");
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Vec<Value> = resp.json().await.expect("parse report");

    let entry = report
        .iter()
        .find(|r| r["product_id"].as_i64() == Some(product_id))
        .expect("product in report");
    assert_eq!(entry["units_sold"], 1);
    // cost = base 10.00 + shipment 2.00
    assert_eq!(entry["total_cost"], "12.00");
    assert_eq!(entry["total_profit"], "18.00");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_profit_and_loss_generate_is_idempotent_per_month() {
    let client = Client::new();
    let base_url = api_base_url();

    // A far-future month nothing else writes to
    let month = "2031-01";

    let resp = client
        .post(format!("{base_url}/profit-and-loss/generate?month={month}"))
        .send()
        .await
        .expect("generate statement");
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = resp.json().await.expect("parse statement");

    let resp = client
        .post(format!("{base_url}/profit-and-loss/generate?month={month}"))
        .send()
        .await
        .expect("regenerate statement");
    let second: Value = resp.json().await.expect("parse statement");

    // Same row updated, not a duplicate
    assert_eq!(first["statement_id"], second["statement_id"]);

    // A month with no sales has zero gross profit and non-negative inventory
    assert_eq!(second["gross_sales"], "0.00");
    assert_eq!(second["gross_profit"], "0.00");
    let ending: rust_decimal::Decimal = second["ending_inventory_value"]
        .as_str()
        .expect("ending inventory")
        .parse()
        .expect("decimal");
    assert!(ending >= rust_decimal::Decimal::ZERO);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_profit_and_loss_rejects_bad_month() {
    let client = Client::new();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/profit-and-loss/generate?month=January"))
        .send()
        .await
        .expect("generate statement");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
