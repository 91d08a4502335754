//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Catalog
//! GET    /products?franchise=&q=      - Browse products
//! GET    /products/franchises         - Franchises by category
//! GET    /products/{id}               - Product detail
//!
//! # Custom box
//! GET    /box                         - Box contents
//! DELETE /box                         - Empty the box
//! POST   /box/items                   - Add a product (size for clothing)
//! POST   /box/items/{key}/increase    - One more
//! POST   /box/items/{key}/decrease    - One less
//! DELETE /box/items/{key}             - Remove
//! POST   /box/pick                    - Pick a product up
//! DELETE /box/pick                    - Abandon the drag
//! POST   /box/drop                    - Drop it onto the box
//! POST   /box/add-to-cart             - Box becomes one cart line
//!
//! # Cart
//! GET    /cart                        - Cart contents
//! DELETE /cart                        - Empty the cart
//! POST   /cart/add                    - Add from the product page
//! POST   /cart/increase               - One more
//! POST   /cart/decrease               - One less
//! POST   /cart/remove                 - Remove a line
//!
//! # Checkout & orders
//! POST   /checkout                    - Get the payment page URL
//! GET    /checkout/success            - Confirm payment
//! GET    /orders                      - Order history (requires auth)
//!
//! # Auth
//! POST   /auth/login                  - Rate limited
//! POST   /auth/register               - Rate limited
//! POST   /auth/logout                 - Rate limited
//! GET    /auth/me
//!
//! # Admin (requires admin role)
//! GET    /admin/products
//! POST   /admin/products              - Multipart create
//! DELETE /admin/products/{id}
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod gift_box;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/franchises", get(products::franchises))
        .route("/{id}", get(products::show))
}

/// Create the custom box routes router.
pub fn box_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(gift_box::show).delete(gift_box::clear))
        .route("/items", post(gift_box::add_item))
        .route("/items/{key}", delete(gift_box::remove))
        .route("/items/{key}/increase", post(gift_box::increase))
        .route("/items/{key}/decrease", post(gift_box::decrease))
        .route("/pick", post(gift_box::pick).delete(gift_box::cancel_pick))
        .route("/drop", post(gift_box::drop_item))
        .route("/add-to-cart", post(gift_box::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
        .route("/me", get(auth::me))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::index).post(admin::create))
        .route("/products/{id}", delete(admin::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/box", box_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::start))
        .route("/checkout/success", get(checkout::success))
        .route("/orders", get(orders::index))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the remote service.
async fn health() -> &'static str {
    "ok"
}
