//! Integration tests for the cart and its remote mirror.

use reqwest::StatusCode;
use serde_json::json;

use frikibox_integration_tests::TestContext;

#[tokio::test]
async fn test_anonymous_cart_is_never_sent() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirror"], "local");

    ctx.post("/cart/increase", &json!({"product_id": "1"}))
        .await;
    ctx.post("/cart/decrease", &json!({"product_id": "1"}))
        .await;
    ctx.delete("/cart").await;

    assert!(ctx.fake.recorded().cart_saves.is_empty());
}

#[tokio::test]
async fn test_cart_total_and_count() {
    let ctx = TestContext::new().await;

    ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    let (_, body) = ctx
        .post("/cart/add", &json!({"product_id": "2", "size": "M"}))
        .await;

    assert_eq!(body["cart"]["total"], 25.0);
    assert_eq!(body["cart"]["itemCount"], 3);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart, body["cart"]);
}

#[tokio::test]
async fn test_add_validates_clothing_size() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/cart/add", &json!({"product_id": "2"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post("/cart/add", &json!({"product_id": "2", "size": "S"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn test_add_resolves_variant_from_catalog() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .post("/cart/add", &json!({"product_id": "3", "variant_id": 31}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let line = &body["cart"]["items"][0];
    assert_eq!(line["product"]["id"], "31");
    assert_eq!(line["product"]["name"], "Pikachu Mug");
    assert_eq!(line["product"]["price"], 6.0);

    let (status, _) = ctx
        .post(
            "/cart/add",
            &json!({"product_id": "3", "variant_id": "404"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.post("/cart/add", &json!({"product_id": "404"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removing_missing_line_is_a_no_op() {
    let ctx = TestContext::new().await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;

    let (status, body) = ctx
        .post("/cart/remove", &json!({"product_id": "nope"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["itemCount"], 1);

    let (_, body) = ctx.post("/cart/remove", &json!({"product_id": "1"})).await;
    assert_eq!(body["cart"]["itemCount"], 0);
}

#[tokio::test]
async fn test_signed_in_cart_is_mirrored() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.login("fan@frikibox.com").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    assert_eq!(body["mirror"], "synced");

    let recorded = ctx.fake.recorded();
    let (uid, saved) = recorded.cart_saves.last().unwrap();
    assert_eq!(uid, "7");
    assert_eq!(saved["items"][0]["id"], "1");
    assert_eq!(saved["items"][0]["quantity"], 1);
    assert_eq!(saved["items"][0]["selectedSize"], "");
}

#[tokio::test]
async fn test_failed_mirror_keeps_session_change() {
    let ctx = TestContext::new().await;
    ctx.login("fan@frikibox.com").await;
    ctx.fake.recorded().carts_down = true;

    let (status, body) = ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirror"], "failed");
    assert_eq!(body["cart"]["itemCount"], 1);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 1);
    assert!(ctx.fake.recorded().cart_saves.is_empty());

    ctx.fake.recorded().carts_down = false;
    let (_, body) = ctx
        .post("/cart/increase", &json!({"product_id": "1"}))
        .await;
    assert_eq!(body["mirror"], "synced");
    assert_eq!(ctx.fake.recorded().carts["7"]["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_login_loads_stored_cart() {
    let ctx = TestContext::new().await;
    ctx.fake.recorded().carts.insert(
        "7".to_string(),
        json!({"items": [
            {"id": 1, "name": "Baby Yoda Figure", "price": 10, "quantity": 0},
            {"id": 1, "name": "Baby Yoda Figure", "price": 10},
            {"id": "2", "name": "Naruto Shirt", "price": "5", "quantity": 2, "selected_size": "L"}
        ]}),
    );

    // Anything added before signing in is dropped
    ctx.post("/cart/add", &json!({"product_id": "3"})).await;

    let (status, body) = ctx.login("fan@frikibox.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "7");
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["cart"]["itemCount"], 4);
    assert_eq!(body["cart"]["total"], 30.0);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["items"][1]["selectedSize"], "L");
}

#[tokio::test]
async fn test_logout_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.login("fan@frikibox.com").await;
    ctx.post("/cart/add", &json!({"product_id": "1"})).await;
    let saves = ctx.fake.recorded().cart_saves.len();

    let (status, _) = ctx.post("/auth/logout", &json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 0);

    // The stored cart is kept for the next login
    let (_, body) = ctx.post("/cart/add", &json!({"product_id": "3"})).await;
    assert_eq!(body["mirror"], "local");
    assert_eq!(ctx.fake.recorded().cart_saves.len(), saves);
}
