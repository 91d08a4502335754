//! Orders, checkout confirmations and the per-visitor order history.
//!
//! Order totals are never read from a payload. [`Order::total`] always
//! recomputes them from the line items, so a stale or wrong `total` field
//! sent by the order service has no effect.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{OrderId, OrderStatus, ProductId};

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default, alias = "id", alias = "product_id")]
    pub product_id: Option<ProductId>,
    pub name: String,
    #[serde(default = "one")]
    pub quantity: u32,
    /// Unit price; a missing price counts as zero.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, alias = "selected_size")]
    pub selected_size: String,
    #[serde(default, alias = "image_url")]
    pub image_url: String,
}

const fn one() -> u32 {
    1
}

impl OrderLine {
    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(
        default,
        alias = "date",
        alias = "created_at",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Σ price × quantity over the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderLine::line_total).sum()
    }
}

/// Accept RFC 3339 strings or Unix milliseconds; anything else is `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// A line of a checkout confirmation, as reported by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationLine {
    pub name: String,
    #[serde(default = "one")]
    pub quantity: u32,
    /// Line total (unit price × quantity).
    #[serde(default, with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Summary of a completed checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfirmation {
    #[serde(alias = "id", alias = "session_id")]
    pub session_id: OrderId,
    #[serde(default)]
    pub items: Vec<ConfirmationLine>,
    /// Total as reported by the processor, for display only.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

impl CheckoutConfirmation {
    /// Convert into an order for the history, stamped with `now`.
    ///
    /// Unit prices are derived from line amounts.
    #[must_use]
    pub fn to_order(&self, now: DateTime<Utc>) -> Order {
        let items = self
            .items
            .iter()
            .map(|line| OrderLine {
                product_id: None,
                name: line.name.clone(),
                quantity: line.quantity,
                price: line.amount.checked_div(Decimal::from(line.quantity)),
                selected_size: String::new(),
                image_url: String::new(),
            })
            .collect();

        Order {
            id: self.session_id.clone(),
            created_at: Some(now),
            status: OrderStatus::Paid,
            items,
        }
    }
}

/// Most-recent-first list of a visitor's orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Put `order` at the front, dropping any older entry with the same id.
    pub fn record(&mut self, order: Order) {
        self.orders.retain(|existing| existing.id != order.id);
        self.orders.insert(0, order);
    }

    /// Replace the whole history, e.g. after a remote refresh.
    pub fn replace(&mut self, orders: Vec<Order>) {
        self.orders = orders;
    }

    /// Whether no orders are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
