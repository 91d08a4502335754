//! Order history route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use frikibox_core::Order;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::Visitor;
use crate::state::AppState;

/// An order with its total recomputed from the lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            total: order.total(),
            order,
        }
    }
}

/// Where the listed orders came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    /// Fresh from the remote service.
    Remote,
    /// The session mirror, because the remote fetch failed.
    Mirror,
}

/// Order history response.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderView>,
    pub source: OrderSource,
}

/// List the signed-in user's orders.
///
/// Falls back to the session mirror when the remote service is unavailable.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Json<OrdersResponse>> {
    let visitor = Visitor::new(&session);
    let mut history = visitor.orders().await?;

    let source = match state.api().my_orders(&user.id).await {
        Ok(orders) => {
            history.replace(orders);
            visitor.set_orders(&history).await?;
            OrderSource::Remote
        }
        Err(e) => {
            tracing::warn!(error = %e, "Serving mirrored orders");
            OrderSource::Mirror
        }
    };

    Ok(Json(OrdersResponse {
        orders: history.orders().iter().cloned().map(OrderView::from).collect(),
        source,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_view_ignores_payload_total() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "ord-1",
            "status": "Pagado",
            "total": 999,
            "items": [
                {"name": "Figure", "quantity": 2, "price": 10.5},
                {"name": "Mystery", "quantity": 1}
            ]
        }))
        .unwrap();

        let json = serde_json::to_value(OrderView::from(order)).unwrap();
        assert_eq!(json["total"], 21.0);
        assert_eq!(json["id"], "ord-1");
    }
}
