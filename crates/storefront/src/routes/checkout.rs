//! Checkout route handlers.
//!
//! Payment happens on the payment provider's hosted page. We validate the
//! cart and address, hand both over, and return the provider URL. The
//! provider sends the visitor back to `/checkout/success`.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frikibox_core::{CheckoutConfirmation, ShippingAddress, validate_checkout};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::Visitor;
use crate::routes::cart::store_cart;
use crate::routes::orders::OrderView;
use crate::services::MirrorStatus;
use crate::state::AppState;

/// Checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub address: ShippingAddress,
}

/// Checkout response with the payment page to redirect to.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
    pub mirror: MirrorStatus,
}

/// Query parameters of the payment provider's return URL.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// Confirmation shown after a successful payment.
#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub confirmation: CheckoutConfirmation,
    pub order: OrderView,
}

/// Start checkout.
///
/// An empty cart or a blank address field is rejected before anything is
/// sent. On success the cart is emptied.
#[instrument(skip(state, session, req))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let visitor = Visitor::new(&session);
    let mut cart = visitor.cart().await?;

    validate_checkout(&cart, &req.address)?;

    let url = state.api().create_payment(&cart, &req.address).await?;
    add_breadcrumb("checkout", "Payment session created", None);
    tracing::info!(items = cart.item_count(), "Handed cart to payment provider");

    cart.clear();
    let stored = store_cart(&state, visitor, &cart).await?;

    Ok(Json(CheckoutResponse {
        url,
        mirror: stored.mirror,
    }))
}

/// Confirm a finished payment and record the order.
#[instrument(skip(state, session))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SuccessQuery>,
) -> Result<Json<ConfirmationView>> {
    let session_id = query
        .session_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing checkout session id".to_string()))?;

    let confirmation = state.api().checkout_session(&session_id).await?;
    let order = confirmation.to_order(Utc::now());

    let visitor = Visitor::new(&session);
    let mut history = visitor.orders().await?;
    history.record(order.clone());
    visitor.set_orders(&history).await?;

    tracing::info!(order_id = %order.id, "Recorded confirmed order");
    Ok(Json(ConfirmationView {
        confirmation,
        order: OrderView::from(order),
    }))
}
