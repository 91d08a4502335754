//! Cart route handlers.
//!
//! The cart lives in the session. Every mutation is stored there first and
//! then mirrored to the remote service when someone is signed in.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frikibox_core::{CartItem, CartLedger, Price, ProductId, VariantId};

use crate::error::{AppError, Result};
use crate::models::Visitor;
use crate::routes::products::required_size;
use crate::services::MirrorStatus;
use crate::state::AppState;

/// One cart line with its computed total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Total formatted for display, e.g. `25.00€`.
    pub total_display: String,
}

impl From<&CartLedger> for CartView {
    fn from(cart: &CartLedger) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            item_count: cart.item_count(),
            total: cart.total(),
            total_display: Price::eur(cart.total()).display(),
        }
    }
}

/// Response to a cart mutation.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    pub mirror: MirrorStatus,
}

/// Add-to-cart request from the product page.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub size: Option<String>,
}

/// Request naming an existing cart line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: String,
}

/// Store `cart` in the session and mirror it for a signed-in visitor.
pub(crate) async fn store_cart(
    state: &AppState,
    visitor: Visitor<'_>,
    cart: &CartLedger,
) -> Result<CartResponse> {
    visitor.set_cart(cart).await?;

    let user = visitor.user().await?;
    let mirror = state.cart_mirror().save(user.as_ref(), cart).await;

    Ok(CartResponse {
        cart: CartView::from(cart),
        mirror,
    })
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = Visitor::new(&session).cart().await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// The product is resolved from the catalog so prices never come from the
/// client. A chosen variant replaces the product's id, name and price.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let mut product = state.api().product(&req.product_id).await?;

    if let Some(variant_id) = &req.variant_id {
        let variant = product
            .variant(variant_id)
            .ok_or_else(|| AppError::NotFound(format!("Variant not found: {variant_id}")))?;
        product = product.with_variant(variant);
    }

    let size = required_size(&product, req.size.as_deref())?;

    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;
    cart.add(&product, &size);

    tracing::info!(product_id = %product.id, size = %size, "Added product to cart");
    store_cart(&state, visitor, &cart).await.map(Json)
}

/// Increment a cart line.
#[instrument(skip(state, session))]
pub async fn increase(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LineRequest>,
) -> Result<Json<CartResponse>> {
    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;
    cart.increase(&req.product_id, None, &req.size);
    store_cart(&state, visitor, &cart).await.map(Json)
}

/// Decrement a cart line, removing it at zero.
#[instrument(skip(state, session))]
pub async fn decrease(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LineRequest>,
) -> Result<Json<CartResponse>> {
    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;
    cart.decrease(&req.product_id, &req.size);
    store_cart(&state, visitor, &cart).await.map(Json)
}

/// Remove a cart line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LineRequest>,
) -> Result<Json<CartResponse>> {
    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;
    cart.remove(&req.product_id, &req.size);
    store_cart(&state, visitor, &cart).await.map(Json)
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;
    cart.clear();
    store_cart(&state, visitor, &cart).await.map(Json)
}
