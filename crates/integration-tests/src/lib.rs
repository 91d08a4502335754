//! Integration tests for the FrikiBox storefront.
//!
//! Each test starts a fake FrikiBox service and a storefront pointed at it,
//! both on ephemeral ports, then drives the storefront with a cookie-enabled
//! HTTP client. The fake records every write it receives so tests can check
//! what was (and was not) sent upstream.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p frikibox-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use frikibox_storefront::{
    build_router,
    config::{ApiConfig, AuthMode, SentryConfig, StorefrontConfig},
    state::AppState,
};

/// Email the fake auth service treats as an administrator.
pub const ADMIN_EMAIL: &str = "admin@frikibox.com";

/// Password the fake auth service always rejects.
pub const WRONG_PASSWORD: &str = "wrong-password";

/// Email the fake registration endpoint reports as taken.
pub const TAKEN_EMAIL: &str = "taken@frikibox.com";

/// Payment page returned by the fake payment endpoint.
pub const PAYMENT_URL: &str = "https://pay.example.com/c/cs_test_1";

// =============================================================================
// Fake FrikiBox service
// =============================================================================

/// Everything the fake service has been asked to store.
#[derive(Debug, Default)]
pub struct Recorded {
    /// `(user id, body)` of every `POST /cart/{uid}`.
    pub cart_saves: Vec<(String, Value)>,
    /// Stored carts by user id, served by `GET /cart/{uid}`.
    pub carts: HashMap<String, Value>,
    /// Bodies of `POST /payments/payment`.
    pub payments: Vec<Value>,
    /// Field names of every `POST /products`.
    pub created_products: Vec<Vec<String>>,
    /// Ids of every `DELETE /products/{id}`.
    pub deleted_products: Vec<String>,
    /// Make `GET /orders/my-orders` fail.
    pub orders_down: bool,
    /// Make `POST /cart/{uid}` fail.
    pub carts_down: bool,
    /// Make `POST /payments/payment` fail with a 5xx.
    pub payment_down: bool,
    /// Make `POST /payments/payment` succeed without a `url`.
    pub payment_without_url: bool,
}

/// Handle on a running fake FrikiBox service.
#[derive(Clone)]
pub struct FakeService {
    pub url: Url,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeService {
    /// Start the fake service on an ephemeral port.
    pub async fn start() -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let app = Router::new()
            .route("/products/all", get(fake_products))
            .route("/products", post(fake_create_product))
            .route(
                "/products/{id}",
                get(fake_product).delete(fake_delete_product),
            )
            .route("/auth/login", post(fake_login))
            .route("/auth/register", post(fake_register))
            .route("/cart/{uid}", get(fake_load_cart).post(fake_save_cart))
            .route("/payments/payment", post(fake_payment))
            .route("/orders/my-orders", get(fake_orders))
            .route("/checkout-session", get(fake_checkout_session))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("Fake service has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake service crashed");
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).expect("Fake service URL"),
            recorded,
        }
    }

    /// Everything recorded so far.
    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("Fake service state poisoned")
    }
}

type Shared = State<Arc<Mutex<Recorded>>>;

fn lock(state: &Arc<Mutex<Recorded>>) -> MutexGuard<'_, Recorded> {
    state.lock().expect("Fake service state poisoned")
}

/// The fake catalog, deliberately mixing the field spellings the real
/// service uses.
#[must_use]
pub fn catalog() -> Value {
    json!([
        {
            "id": 1,
            "name": "Baby Yoda Figure",
            "price": 10,
            "category": "figures",
            "image_url": "/img/yoda.png",
            "tags": ["star wars", "figure"],
            "main_franchise": "Star Wars",
            "franchise_category": "Movies"
        },
        {
            "id": "2",
            "name": "Naruto Shirt",
            "price": "5",
            "category": "clothing",
            "availableSizes": "[\"M\",\"L\"]",
            "imageUrl": "/img/naruto.png",
            "tags": "anime,shirt",
            "mainFranchise": "Naruto",
            "franchiseCategory": "Anime"
        },
        {
            "id": 3,
            "name": "Pokemon Mug",
            "price": 4.5,
            "category": "mugs",
            "image_url": "/img/mug.png",
            "main_franchise": "Pokemon",
            "franchise_category": "Anime",
            "variants": [
                {"id": 31, "name": "Pikachu Mug", "price": 6, "description": "Yellow"}
            ]
        }
    ])
}

async fn fake_products() -> Json<Value> {
    Json(catalog())
}

async fn fake_product(Path(id): Path<String>) -> Response {
    let found = catalog()
        .as_array()
        .and_then(|products| {
            products
                .iter()
                .find(|p| p["id"].to_string().trim_matches('"') == id)
                .cloned()
        });

    match found {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Product not found"})),
        )
            .into_response(),
    }
}

async fn fake_create_product(State(state): Shared, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        if let Some(name) = field.name() {
            fields.push(name.to_string());
        }
    }
    lock(&state).created_products.push(fields);

    (
        StatusCode::CREATED,
        Json(json!({"id": 99, "name": "New Figure", "price": 12})),
    )
        .into_response()
}

async fn fake_delete_product(State(state): Shared, Path(id): Path<String>) -> StatusCode {
    lock(&state).deleted_products.push(id);
    StatusCode::NO_CONTENT
}

async fn fake_login(Json(body): Json<Value>) -> Response {
    if body["password"] == WRONG_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Bad credentials"})),
        )
            .into_response();
    }

    let email = body["email"].as_str().unwrap_or_default();
    let user = if email == ADMIN_EMAIL {
        json!({"uid": "admin-1", "name": "Admin", "email": email, "role": "admin"})
    } else {
        json!({"id": 7, "name": "Customer", "email": email})
    };
    Json(json!({ "user": user })).into_response()
}

async fn fake_register(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Email already registered"})),
        )
            .into_response();
    }

    Json(json!({
        "user": {"id": "new-1", "name": body["name"], "email": email, "isAdmin": false}
    }))
    .into_response()
}

async fn fake_load_cart(State(state): Shared, Path(uid): Path<String>) -> Json<Value> {
    let cart = lock(&state).carts.get(&uid).cloned();
    Json(cart.unwrap_or_else(|| json!({"items": []})))
}

async fn fake_save_cart(
    State(state): Shared,
    Path(uid): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut recorded = lock(&state);
    if recorded.carts_down {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    recorded.carts.insert(uid.clone(), body.clone());
    recorded.cart_saves.push((uid, body));
    StatusCode::OK
}

async fn fake_payment(State(state): Shared, Json(body): Json<Value>) -> Response {
    let mut recorded = lock(&state);
    if recorded.payment_down {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Stripe unavailable"})),
        )
            .into_response();
    }
    recorded.payments.push(body);

    if recorded.payment_without_url {
        return Json(json!({"id": "cs_test_1"})).into_response();
    }
    Json(json!({ "url": PAYMENT_URL })).into_response()
}

async fn fake_orders(
    State(state): Shared,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if lock(&state).orders_down {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let user_id = query.get("userId").cloned().unwrap_or_default();
    Json(json!([
        {
            "id": format!("order-{user_id}"),
            "date": "2025-03-01T10:00:00Z",
            "status": "Enviado",
            "total": 1000,
            "items": [
                {"id": 1, "name": "Baby Yoda Figure", "quantity": 2, "price": 10},
                {"id": 3, "name": "Pokemon Mug", "quantity": 1, "price": 4.5}
            ]
        }
    ]))
    .into_response()
}

async fn fake_checkout_session(Query(query): Query<HashMap<String, String>>) -> Response {
    let Some(session_id) = query.get("sessionId") else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    Json(json!({
        "id": session_id,
        "items": [
            {"name": "Baby Yoda Figure", "quantity": 2, "amount": 20},
            {"name": "Naruto Shirt", "quantity": 1, "amount": 5}
        ],
        "total": 25
    }))
    .into_response()
}

// =============================================================================
// Test context
// =============================================================================

/// A storefront wired to a fake FrikiBox service, plus a client holding one
/// visitor's session cookie.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub fake: FakeService,
}

impl TestContext {
    /// Storefront using the remote auth service.
    pub async fn new() -> Self {
        Self::with_auth_mode(AuthMode::Remote).await
    }

    /// Storefront using the given auth backend.
    pub async fn with_auth_mode(auth_mode: AuthMode) -> Self {
        let fake = FakeService::start().await;

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            api: ApiConfig::new(fake.url.clone()),
            auth_mode,
            sentry: SentryConfig::default(),
        };
        let state = AppState::new(config).expect("Failed to build storefront state");
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Storefront has no address");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Storefront crashed");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            fake,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET` a path and return status and JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        Self::read(resp).await
    }

    /// `POST` JSON to a path and return status and JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed");
        Self::read(resp).await
    }

    /// `DELETE` a path and return status and JSON body.
    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed");
        Self::read(resp).await
    }

    /// Sign in through the storefront.
    pub async fn login(&self, email: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/login",
            &json!({"email": email, "password": "correct-horse"}),
        )
        .await
    }

    async fn read(resp: reqwest::Response) -> (StatusCode, Value) {
        let status = StatusCode::from_u16(resp.status().as_u16()).expect("Valid status code");
        let text = resp.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, body)
    }
}
