//! Integration tests for the custom box builder.

use reqwest::StatusCode;
use serde_json::json;

use frikibox_core::BOX_CAPACITY;
use frikibox_integration_tests::TestContext;

#[tokio::test]
async fn test_box_fills_up_to_capacity() {
    let ctx = TestContext::new().await;

    for _ in 0..BOX_CAPACITY {
        let (status, body) = ctx.post("/box/items", &json!({"product_id": "1"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], true);
    }

    let (status, body) = ctx.post("/box/items", &json!({"product_id": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"], false);
    assert_eq!(body["box"]["itemCount"], 6);
    assert_eq!(body["box"]["remaining"], 0);
    assert_eq!(body["box"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["box"]["items"][0]["quantity"], 6);
}

#[tokio::test]
async fn test_clothing_sizes_are_separate_entries() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/box/items", &json!({"product_id": "2"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post("/box/items", &json!({"product_id": "2", "size": "XXL"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.post("/box/items", &json!({"product_id": "2", "size": "M"}))
        .await;
    let (_, body) = ctx
        .post("/box/items", &json!({"product_id": "2", "size": "L"}))
        .await;

    let ids: Vec<&str> = body["box"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["2-M", "2-L"]);
    assert_eq!(body["box"]["itemCount"], 2);
}

#[tokio::test]
async fn test_quantity_controls() {
    let ctx = TestContext::new().await;
    ctx.post("/box/items", &json!({"product_id": "1"})).await;

    let (_, body) = ctx.post("/box/items/1/increase", &json!({})).await;
    assert_eq!(body["added"], true);
    assert_eq!(body["box"]["items"][0]["quantity"], 2);

    let (_, body) = ctx.post("/box/items/1/decrease", &json!({})).await;
    assert_eq!(body["items"][0]["quantity"], 1);

    let (_, body) = ctx.post("/box/items/1/decrease", &json!({})).await;
    assert_eq!(body["itemCount"], 0);

    let (status, body) = ctx.delete("/box/items/missing-").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 0);
}

#[tokio::test]
async fn test_drag_refuses_clothing() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.post("/box/pick", &json!({"product_id": "2"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Naruto Shirt"));

    let (_, body) = ctx.get("/box").await;
    assert!(body["picked"].is_null());
}

#[tokio::test]
async fn test_drop_without_pick_is_a_no_op() {
    let ctx = TestContext::new().await;
    ctx.post("/box/items", &json!({"product_id": "3"})).await;

    let (status, body) = ctx.post("/box/drop", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dropped"], false);
    assert_eq!(body["added"], false);
    assert_eq!(body["box"]["itemCount"], 1);
}

#[tokio::test]
async fn test_pick_and_drop() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.post("/box/pick", &json!({"product_id": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["picked"]["name"], "Baby Yoda Figure");

    let (_, body) = ctx.post("/box/drop", &json!({})).await;
    assert_eq!(body["dropped"], true);
    assert_eq!(body["added"], true);
    assert_eq!(body["box"]["items"][0]["id"], "1");
    assert!(body["box"]["picked"].is_null());

    // The pick was consumed
    let (_, body) = ctx.post("/box/drop", &json!({})).await;
    assert_eq!(body["dropped"], false);
    assert_eq!(body["box"]["itemCount"], 1);
}

#[tokio::test]
async fn test_box_becomes_one_cart_line() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post("/box/add-to-cart", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.post("/box/items", &json!({"product_id": "1"})).await;
    ctx.post("/box/items", &json!({"product_id": "1"})).await;
    ctx.post("/box/items", &json!({"product_id": "2", "size": "M"}))
        .await;

    let (status, body) = ctx.post("/box/add-to-cart", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirror"], "local");

    let line = &body["cart"]["items"][0];
    assert!(line["product"]["id"].as_str().unwrap().starts_with("custom-box-"));
    assert_eq!(line["product"]["name"], "Custom FrikiBox (3 items)");
    assert_eq!(line["product"]["price"], 25.0);
    assert_eq!(
        line["product"]["description"],
        "Baby Yoda Figure x2, Naruto Shirt (M) x1"
    );
    assert_eq!(line["contains"].as_array().unwrap().len(), 2);
    assert_eq!(body["cart"]["total"], 25.0);

    let (_, body) = ctx.get("/box").await;
    assert_eq!(body["itemCount"], 0);
}

#[tokio::test]
async fn test_box_reaches_cart_when_mirror_fails() {
    let ctx = TestContext::new().await;
    ctx.login("fan@frikibox.com").await;
    ctx.fake.recorded().carts_down = true;

    ctx.post("/box/items", &json!({"product_id": "3"})).await;
    let (status, body) = ctx.post("/box/add-to-cart", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mirror"], "failed");

    let (_, cart) = ctx.get("/cart").await;
    assert_eq!(cart["itemCount"], 1);
    assert_eq!(
        cart["items"][0]["product"]["name"],
        "Custom FrikiBox (1 items)"
    );

    let (_, gift_box) = ctx.get("/box").await;
    assert_eq!(gift_box["itemCount"], 0);
}

#[tokio::test]
async fn test_abandoned_drag_leaves_box_alone() {
    let ctx = TestContext::new().await;

    ctx.post("/box/pick", &json!({"product_id": "1"})).await;
    let (status, body) = ctx.delete("/box/pick").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["picked"].is_null());
    assert_eq!(body["itemCount"], 0);

    let (_, body) = ctx.post("/box/drop", &json!({})).await;
    assert_eq!(body["dropped"], false);
    assert_eq!(body["box"]["itemCount"], 0);
}
