//! Shopping cart ledger.
//!
//! Lines are identified by (product id, selected size). The ledger has no
//! capacity limit; quantities are always at least 1 and a line is removed
//! instead of reaching 0.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::gift_box::{BoxItem, CustomBox};
use crate::product::Product;
use crate::types::ProductId;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    /// Size chosen for clothing; empty otherwise.
    #[serde(default)]
    pub selected_size: String,
    /// Contents of a custom box line; empty for regular products.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<BoxItem>,
}

impl CartItem {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.unit_price() * Decimal::from(self.quantity)
    }

    fn matches(&self, id: &ProductId, size: &str) -> bool {
        &self.product.id == id && self.selected_size == size
    }
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLedger {
    items: Vec<CartItem>,
}

impl CartLedger {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines of unknown quality, e.g. a remote load.
    ///
    /// Quantities of 0 become 1 and lines sharing a key are merged, keeping
    /// the first occurrence's position and snapshot.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut ledger = Self::new();
        for mut item in items {
            item.quantity = item.quantity.max(1);
            if let Some(existing) = ledger
                .items
                .iter_mut()
                .find(|line| line.matches(&item.product.id, &item.selected_size))
            {
                existing.quantity += item.quantity;
            } else {
                ledger.items.push(item);
            }
        }
        ledger
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the ledger and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, id: &ProductId, size: &str) -> Option<&CartItem> {
        self.items.iter().find(|line| line.matches(id, size))
    }

    /// Add one unit of `product` in `size`.
    pub fn add(&mut self, product: &Product, size: &str) {
        self.increase(&product.id, Some(product), size);
    }

    /// Add one unit to the line keyed by (`id`, `size`).
    ///
    /// When no such line exists a new one is created from `product`; without
    /// a product the call changes nothing.
    pub fn increase(&mut self, id: &ProductId, product: Option<&Product>, size: &str) {
        if let Some(line) = self.items.iter_mut().find(|line| line.matches(id, size)) {
            line.quantity += 1;
            return;
        }
        if let Some(product) = product {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
                selected_size: size.to_owned(),
                contains: Vec::new(),
            });
        }
    }

    /// Remove one unit; the line disappears when its last unit goes.
    pub fn decrease(&mut self, id: &ProductId, size: &str) {
        let Some(pos) = self.items.iter().position(|line| line.matches(id, size)) else {
            return;
        };
        if let Some(line) = self.items.get_mut(pos)
            && line.quantity > 1
        {
            line.quantity -= 1;
            return;
        }
        self.items.remove(pos);
    }

    /// Remove a line regardless of its quantity.
    pub fn remove(&mut self, id: &ProductId, size: &str) {
        self.items.retain(|line| !line.matches(id, size));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add a finished custom box as its own line.
    ///
    /// If a line with the same id is already present, the box id gets a
    /// numeric suffix so the two never merge. Returns the id used.
    pub fn add_custom_box(&mut self, custom: CustomBox) -> ProductId {
        let CustomBox {
            mut product,
            contains,
        } = custom;

        let base = product.id.to_string();
        let mut suffix = 1_u32;
        while self.items.iter().any(|line| line.product.id == product.id) {
            product.id = ProductId::new(format!("{base}-{suffix}"));
            suffix += 1;
        }

        let id = product.id.clone();
        self.items.push(CartItem {
            product,
            quantity: 1,
            selected_size: String::new(),
            contains,
        });
        id
    }

    /// Sum of price × quantity; missing prices count as zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities, shown as the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}
