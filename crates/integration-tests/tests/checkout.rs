//! Integration tests for checkout and order history.

use reqwest::StatusCode;
use serde_json::json;

use frikibox_integration_tests::{PAYMENT_URL, TestContext};

fn address() -> serde_json::Value {
    json!({
        "fullName": "Ana Friki",
        "street": "Calle Mayor 1",
        "city": "Madrid",
        "postalCode": "28013",
        "country": "ES"
    })
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/checkout", &json!({"address": address()})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(ctx.fake.recorded().payments.is_empty());
}

#[tokio::test]
async fn test_blank_address_field_sends_nothing() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;

    let mut incomplete = address();
    incomplete["city"] = json!("   ");

    let (status, body) = ctx.post("/checkout", &json!({"address": incomplete})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("city"));
    assert!(ctx.fake.recorded().payments.is_empty());

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 1);
}

#[tokio::test]
async fn test_checkout_returns_url_and_empties_cart() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    ctx.post("/cart/add", &json!({"product_id": "2", "size": "M"}))
        .await;

    let (status, body) = ctx.post("/checkout", &json!({"address": address()})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], PAYMENT_URL);

    {
        let recorded = ctx.fake.recorded();
        let sent = recorded.payments.last().unwrap();
        assert_eq!(sent["cart"].as_array().unwrap().len(), 2);
        assert_eq!(sent["cart"][1]["selectedSize"], "M");
        assert_eq!(sent["address"]["postalCode"], "28013");
    }

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn test_payment_failure_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;

    ctx.fake.recorded().payment_down = true;
    let (status, body) = ctx.post("/checkout", &json!({"address": address()})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "External service error");

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 1);
}

#[tokio::test]
async fn test_payment_without_url_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;

    ctx.fake.recorded().payment_without_url = true;
    let (status, body) = ctx.post("/checkout", &json!({"address": address()})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("url").is_none());
    assert_eq!(ctx.fake.recorded().payments.len(), 1);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 1);
}

#[tokio::test]
async fn test_success_records_order() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.get("/checkout/success").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx.get("/checkout/success?session_id=cs_test_1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["id"], "cs_test_1");
    assert_eq!(body["order"]["status"], "paid");
    assert_eq!(body["order"]["total"], 25.0);
    assert_eq!(body["order"]["items"][0]["price"], 10.0);
}

#[tokio::test]
async fn test_orders_require_login() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.get("/orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_totals_are_recomputed() {
    let ctx = TestContext::new().await;
    ctx.login("fan@frikibox.com").await;

    let (status, body) = ctx.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "remote");

    let order = &body["orders"][0];
    assert_eq!(order["id"], "order-7");
    assert_eq!(order["status"], "shipped");
    assert_eq!(order["total"], 24.5);
}

#[tokio::test]
async fn test_orders_fall_back_to_mirror() {
    let ctx = TestContext::new().await;
    ctx.login("fan@frikibox.com").await;
    ctx.get("/orders").await;

    ctx.fake.recorded().orders_down = true;

    let (status, body) = ctx.get("/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mirror");
    assert_eq!(body["orders"][0]["id"], "order-7");
}
