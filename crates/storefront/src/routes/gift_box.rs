//! Custom box route handlers.
//!
//! Visitors fill a box with up to six items, either by clicking "add" (with
//! a size for clothing) or by picking a product up and dropping it on the
//! box. A full box is not an error: the response says `"added": false`.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frikibox_core::{AddOutcome, BOX_CAPACITY, BoxBuilder, BoxItem, Price, Product, ProductId};

use crate::error::{AppError, Result};
use crate::models::Visitor;
use crate::routes::cart::{CartResponse, store_cart};
use crate::routes::products::required_size;
use crate::state::AppState;

/// Box display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxView {
    pub items: Vec<BoxItem>,
    pub item_count: u32,
    pub capacity: u32,
    pub remaining: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub total_display: String,
    /// Product currently picked up, if a drag is in progress.
    pub picked: Option<Product>,
}

impl BoxView {
    fn new(gift_box: &BoxBuilder, picked: Option<&Product>) -> Self {
        Self {
            items: gift_box.items().to_vec(),
            item_count: gift_box.total_item_count(),
            capacity: BOX_CAPACITY,
            remaining: gift_box.remaining_capacity(),
            total: gift_box.total_price(),
            total_display: Price::eur(gift_box.total_price()).display(),
            picked: picked.cloned(),
        }
    }
}

/// Response to an insertion attempt.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub added: bool,
    #[serde(rename = "box")]
    pub gift_box: BoxView,
}

/// Response to a drop.
#[derive(Debug, Serialize)]
pub struct DropResponse {
    /// Whether anything was being dragged.
    pub dropped: bool,
    pub added: bool,
    #[serde(rename = "box")]
    pub gift_box: BoxView,
}

/// Click-to-add request.
#[derive(Debug, Deserialize)]
pub struct AddToBoxRequest {
    pub product_id: ProductId,
    pub size: Option<String>,
}

/// Pick-up request.
#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub product_id: ProductId,
}

async fn view(visitor: Visitor<'_>, gift_box: &BoxBuilder) -> Result<BoxView> {
    let drag = visitor.drag().await?;
    Ok(BoxView::new(gift_box, drag.picked()))
}

async fn store_box(visitor: Visitor<'_>, gift_box: &BoxBuilder) -> Result<BoxView> {
    visitor.set_gift_box(gift_box).await?;
    view(visitor, gift_box).await
}

fn log_outcome(product_id: &ProductId, outcome: AddOutcome) {
    match outcome {
        AddOutcome::Added => tracing::debug!(product_id = %product_id, "Added item to box"),
        AddOutcome::BoxFull => tracing::info!(product_id = %product_id, "Box is full"),
    }
}

/// Display the box.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<BoxView>> {
    let visitor = Visitor::new(&session);
    let gift_box = visitor.gift_box().await?;
    view(visitor, &gift_box).await.map(Json)
}

/// Add a product to the box, with a size for clothing.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddToBoxRequest>,
) -> Result<Json<AddResponse>> {
    let product = state.api().product(&req.product_id).await?;
    let size = required_size(&product, req.size.as_deref())?;

    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;
    let outcome = gift_box.add_item(&product, &size);
    log_outcome(&product.id, outcome);

    Ok(Json(AddResponse {
        added: outcome.is_added(),
        gift_box: store_box(visitor, &gift_box).await?,
    }))
}

/// Add one more of an item already in the box.
#[instrument(skip(session))]
pub async fn increase(session: Session, Path(key): Path<String>) -> Result<Json<AddResponse>> {
    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;
    let outcome = gift_box.increase_quantity(&key);

    Ok(Json(AddResponse {
        added: outcome.is_added(),
        gift_box: store_box(visitor, &gift_box).await?,
    }))
}

/// Take one of an item out of the box.
#[instrument(skip(session))]
pub async fn decrease(session: Session, Path(key): Path<String>) -> Result<Json<BoxView>> {
    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;
    gift_box.decrease_quantity(&key);
    store_box(visitor, &gift_box).await.map(Json)
}

/// Remove an item from the box.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(key): Path<String>) -> Result<Json<BoxView>> {
    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;
    gift_box.remove_item(&key);
    store_box(visitor, &gift_box).await.map(Json)
}

/// Empty the box.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<BoxView>> {
    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;
    gift_box.clear();
    store_box(visitor, &gift_box).await.map(Json)
}

/// Pick a product up to drag it onto the box.
///
/// Clothing is refused with 422; it has to go through the sized add.
#[instrument(skip(state, session))]
pub async fn pick(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<PickRequest>,
) -> Result<Json<BoxView>> {
    let product = state.api().product(&req.product_id).await?;

    let visitor = Visitor::new(&session);
    let mut drag = visitor.drag().await?;
    drag.pick(product)?;
    visitor.set_drag(&drag).await?;

    let gift_box = visitor.gift_box().await?;
    Ok(Json(BoxView::new(&gift_box, drag.picked())))
}

/// Abandon a drag without touching the box.
#[instrument(skip(session))]
pub async fn cancel_pick(session: Session) -> Result<Json<BoxView>> {
    let visitor = Visitor::new(&session);
    let mut drag = visitor.drag().await?;
    drag.cancel();
    visitor.set_drag(&drag).await?;

    let gift_box = visitor.gift_box().await?;
    Ok(Json(BoxView::new(&gift_box, None)))
}

/// Drop the picked product onto the box.
///
/// Dropping with nothing picked changes nothing. The pick is released
/// whether or not the box had room.
#[instrument(skip(session))]
pub async fn drop_item(session: Session) -> Result<Json<DropResponse>> {
    let visitor = Visitor::new(&session);
    let mut drag = visitor.drag().await?;
    let mut gift_box = visitor.gift_box().await?;

    let Some((product, outcome)) = drag.drop_into(&mut gift_box) else {
        return Ok(Json(DropResponse {
            dropped: false,
            added: false,
            gift_box: BoxView::new(&gift_box, None),
        }));
    };
    log_outcome(&product.id, outcome);

    visitor.set_drag(&drag).await?;
    visitor.set_gift_box(&gift_box).await?;

    Ok(Json(DropResponse {
        dropped: true,
        added: outcome.is_added(),
        gift_box: BoxView::new(&gift_box, None),
    }))
}

/// Turn the box into a single cart line and start a new box.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartResponse>> {
    let visitor = Visitor::new(&session);
    let mut gift_box = visitor.gift_box().await?;

    let custom = gift_box
        .to_cart_line(Utc::now())
        .ok_or_else(|| AppError::BadRequest("Your box is empty".to_string()))?;

    let mut cart = visitor.cart().await?;
    let line_id = cart.add_custom_box(custom);
    let stored = store_cart(&state, visitor, &cart).await?;

    // Only start a new box once the cart holds this one
    gift_box.clear();
    visitor.set_gift_box(&gift_box).await?;

    tracing::info!(line_id = %line_id, "Added custom box to cart");
    Ok(Json(stored))
}
