//! The "build your own FrikiBox" configurator.
//!
//! A [`BoxBuilder`] holds up to [`BOX_CAPACITY`] units of mixed products.
//! Every mutation that could grow the box checks the capacity first and
//! reports the result through [`AddOutcome`]; a full box is a routine,
//! expected event rather than an error. Once the shopper is happy, the box is
//! converted into a single synthetic cart line with [`BoxBuilder::to_cart_line`].
//!
//! Drag-and-drop is modelled as a two-step protocol with [`DragState`]: the
//! source picks a product, the drop target consumes it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// Maximum number of units (not distinct products) in one box.
pub const BOX_CAPACITY: u32 = 6;

/// Artwork shown for a custom box line in the cart.
pub const CUSTOM_BOX_IMAGE: &str = "/assets/caja-frikibox.png";

/// Identity of a box entry: `"{id}-{size}"`, or the bare id when unsized.
#[must_use]
pub fn box_key(id: &ProductId, size: &str) -> String {
    if size.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{size}")
    }
}

/// Result of a capacity-checked insertion.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// The box accepted the unit.
    Added,
    /// The box already holds [`BOX_CAPACITY`] units; nothing changed.
    BoxFull,
}

impl AddOutcome {
    /// `true` when the unit went into the box.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// One entry of the box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxItem {
    /// Key as computed by [`box_key`].
    pub id: String,
    pub product: Product,
    /// Size chosen for clothing; empty otherwise.
    #[serde(default)]
    pub selected_size: String,
    pub quantity: u32,
}

impl BoxItem {
    fn line_total(&self) -> Decimal {
        self.product.unit_price() * Decimal::from(self.quantity)
    }

    fn summary(&self) -> String {
        if self.selected_size.is_empty() {
            format!("{} x{}", self.product.name, self.quantity)
        } else {
            format!(
                "{} ({}) x{}",
                self.product.name, self.selected_size, self.quantity
            )
        }
    }
}

/// A finished box, ready to be added to the cart as one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBox {
    /// Synthetic product standing in for the whole box.
    pub product: Product,
    /// The entries the box was built from, for display.
    pub contains: Vec<BoxItem>,
}

/// In-progress custom box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxBuilder {
    items: Vec<BoxItem>,
}

impl BoxBuilder {
    /// Create an empty box.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[BoxItem] {
        &self.items
    }

    /// Whether the box has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BoxItem> {
        self.items.iter().find(|item| item.id == key)
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn total_item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Units that can still be added.
    #[must_use]
    pub fn remaining_capacity(&self) -> u32 {
        BOX_CAPACITY.saturating_sub(self.total_item_count())
    }

    /// Sum of price × quantity; missing prices count as zero.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(BoxItem::line_total).sum()
    }

    fn is_full(&self) -> bool {
        self.total_item_count() >= BOX_CAPACITY
    }

    /// Add one unit of `product` in `size` (empty for unsized products).
    ///
    /// Merges with an existing entry of the same key.
    pub fn add_item(&mut self, product: &Product, size: &str) -> AddOutcome {
        if self.is_full() {
            return AddOutcome::BoxFull;
        }

        let key = box_key(&product.id, size);
        if let Some(item) = self.items.iter_mut().find(|item| item.id == key) {
            item.quantity += 1;
        } else {
            self.items.push(BoxItem {
                id: key,
                product: product.clone(),
                selected_size: size.to_owned(),
                quantity: 1,
            });
        }
        AddOutcome::Added
    }

    /// Add one unit to an existing entry.
    ///
    /// An unknown key changes nothing but is still reported as accepted when
    /// the box has room.
    pub fn increase_quantity(&mut self, key: &str) -> AddOutcome {
        if self.is_full() {
            return AddOutcome::BoxFull;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == key) {
            item.quantity += 1;
        }
        AddOutcome::Added
    }

    /// Remove one unit; the entry disappears when its last unit goes.
    pub fn decrease_quantity(&mut self, key: &str) {
        let Some(pos) = self.items.iter().position(|item| item.id == key) else {
            return;
        };
        if let Some(item) = self.items.get_mut(pos)
            && item.quantity > 1
        {
            item.quantity -= 1;
            return;
        }
        self.items.remove(pos);
    }

    /// Remove an entry regardless of its quantity.
    pub fn remove_item(&mut self, key: &str) {
        self.items.retain(|item| item.id != key);
    }

    /// Empty the box.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Convert the box into one synthetic cart line.
    ///
    /// Returns `None` for an empty box. The builder itself is left untouched;
    /// callers clear it once the line is in the cart.
    #[must_use]
    pub fn to_cart_line(&self, now: DateTime<Utc>) -> Option<CustomBox> {
        if self.is_empty() {
            return None;
        }

        let description = self
            .items
            .iter()
            .map(BoxItem::summary)
            .collect::<Vec<_>>()
            .join(", ");

        let product = Product {
            description: Some(description),
            image_url: CUSTOM_BOX_IMAGE.to_string(),
            image_hint: "custom box".to_string(),
            ..Product::new(
                format!("custom-box-{}", now.timestamp_millis()).as_str(),
                format!("Custom FrikiBox ({} items)", self.total_item_count()),
                Some(self.total_price()),
            )
        };

        Some(CustomBox {
            product,
            contains: self.items.clone(),
        })
    }
}

/// Error returned when a product cannot be picked up for dragging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickError {
    /// Clothing needs a size, which only the click-to-add path collects.
    #[error("{0} needs a size and cannot be dragged into the box")]
    RequiresSize(String),
}

/// Two-step drag protocol: pick a product, then drop it into a box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragState {
    picked: Option<Product>,
}

impl DragState {
    /// Mark `product` as being dragged, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::RequiresSize`] for clothing products.
    pub fn pick(&mut self, product: Product) -> Result<(), PickError> {
        if product.is_clothing() {
            return Err(PickError::RequiresSize(product.name));
        }
        self.picked = Some(product);
        Ok(())
    }

    /// The product currently being dragged, if any.
    #[must_use]
    pub const fn picked(&self) -> Option<&Product> {
        self.picked.as_ref()
    }

    /// Whether the product with `id` is the one being dragged.
    #[must_use]
    pub fn is_dragging(&self, id: &ProductId) -> bool {
        self.picked.as_ref().is_some_and(|p| &p.id == id)
    }

    /// Abandon the current drag.
    pub fn cancel(&mut self) {
        self.picked = None;
    }

    /// Consume the picked product and insert it into `target`.
    ///
    /// Returns `None` when nothing was picked. The pick is cleared whether or
    /// not the box had room.
    pub fn drop_into(&mut self, target: &mut BoxBuilder) -> Option<(Product, AddOutcome)> {
        let product = self.picked.take()?;
        let outcome = target.add_item(&product, "");
        Some((product, outcome))
    }
}
