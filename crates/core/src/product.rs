//! Catalog products and their purchasable variants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, VariantId};

/// Category whose products are sold by size.
pub const CLOTHING: &str = "clothing";

/// A product as listed in the catalog.
///
/// Products are immutable snapshots of what the remote catalog returned.
/// `price` is absent for products sold only through their variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_back: Option<String>,
    #[serde(default)]
    pub image_hint: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_franchise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

/// A priced variant of a product (e.g. box sizes or editions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// Minimal product with only the fields every listing carries.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Option<Decimal>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            category: None,
            available_sizes: Vec::new(),
            variants: Vec::new(),
            image_url: String::new(),
            image_url_back: None,
            image_hint: String::new(),
            tags: Vec::new(),
            main_franchise: None,
            franchise_category: None,
            stock: None,
        }
    }

    /// Whether the product is sold by size and needs a size selection.
    #[must_use]
    pub fn is_clothing(&self) -> bool {
        self.category.as_deref() == Some(CLOTHING)
    }

    /// Whether `size` is one of the sizes this product is offered in.
    ///
    /// A product without a size list accepts any size.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.available_sizes.is_empty() || self.available_sizes.iter().any(|s| s == size)
    }

    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Purchasable snapshot of this product in the given variant.
    ///
    /// The variant's id, name, price and description replace the product's.
    #[must_use]
    pub fn with_variant(&self, variant: &Variant) -> Self {
        Self {
            id: ProductId::new(variant.id.as_str()),
            name: variant.name.clone(),
            description: Some(variant.description.clone()).filter(|d| !d.is_empty()),
            price: Some(variant.price),
            variants: Vec::new(),
            ..self.clone()
        }
    }

    /// Price used for totals; a missing price counts as zero.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee() -> Product {
        Product {
            category: Some(CLOTHING.to_string()),
            available_sizes: vec!["S".into(), "M".into(), "L".into()],
            ..Product::new("tee", "Camiseta Jedi", Some(Decimal::new(1999, 2)))
        }
    }

    #[test]
    fn test_is_clothing() {
        assert!(tee().is_clothing());
        assert!(!Product::new("mug", "Taza", None).is_clothing());
    }

    #[test]
    fn test_offers_size() {
        assert!(tee().offers_size("M"));
        assert!(!tee().offers_size("XXL"));
        assert!(Product::new("mug", "Taza", None).offers_size("anything"));
    }

    #[test]
    fn test_with_variant_replaces_identity_and_price() {
        let product = Product {
            variants: vec![Variant {
                id: VariantId::new("box-xl"),
                name: "FrikiBox XL".into(),
                price: Decimal::new(4990, 2),
                description: "Ten surprises".into(),
            }],
            ..Product::new("box", "FrikiBox", None)
        };

        let variant = product.variant(&VariantId::new("box-xl")).unwrap();
        let snapshot = product.with_variant(variant);

        assert_eq!(snapshot.id.as_str(), "box-xl");
        assert_eq!(snapshot.name, "FrikiBox XL");
        assert_eq!(snapshot.price, Some(Decimal::new(4990, 2)));
        assert_eq!(snapshot.description.as_deref(), Some("Ten surprises"));
        assert!(snapshot.variants.is_empty());
    }

    #[test]
    fn test_deserialize_numeric_price_and_id() {
        let product: Product = serde_json::from_str(
            r#"{"id": 3, "name": "Funko Goku", "price": 14.5, "tags": ["anime"]}"#,
        )
        .unwrap();
        assert_eq!(product.id.as_str(), "3");
        assert_eq!(product.price, Some(Decimal::new(145, 1)));
        assert_eq!(product.unit_price(), Decimal::new(145, 1));
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let product: Product = serde_json::from_str(r#"{"id": "x", "name": "X"}"#).unwrap();
        assert_eq!(product.price, None);
        assert_eq!(product.unit_price(), Decimal::ZERO);
    }
}
