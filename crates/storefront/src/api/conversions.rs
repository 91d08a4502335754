//! Conversions from wire DTOs to domain types.

use frikibox_core::{CartItem, Email, EmailError, Product, User, UserRole, Variant};
use rust_decimal::Decimal;

use super::types::{WireCartItem, WireProduct, WireUser, WireVariant};

impl From<WireVariant> for Variant {
    fn from(wire: WireVariant) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            price: wire.price.unwrap_or(Decimal::ZERO),
            description: wire.description.unwrap_or_default(),
        }
    }
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            price: wire.price,
            category: wire.category,
            available_sizes: wire.available_sizes,
            variants: wire.variants.into_iter().map(Variant::from).collect(),
            image_url: wire.image_url.unwrap_or_default(),
            image_url_back: wire.image_url_back.filter(|url| !url.is_empty()),
            image_hint: wire
                .image_hint
                .unwrap_or_else(|| "product image".to_string()),
            tags: wire.tags,
            main_franchise: wire.main_franchise,
            franchise_category: wire.franchise_category,
            stock: wire.stock,
        }
    }
}

/// Missing size becomes empty and a missing quantity becomes 1. Zero
/// quantities and duplicate keys are handled by `CartLedger::from_items`.
impl From<WireCartItem> for CartItem {
    fn from(wire: WireCartItem) -> Self {
        Self {
            product: wire.product.into(),
            quantity: wire.quantity.unwrap_or(1),
            selected_size: wire.selected_size.unwrap_or_default(),
            contains: wire.contains,
        }
    }
}

impl TryFrom<WireUser> for User {
    type Error = EmailError;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let claims_admin = wire.is_admin.unwrap_or(false)
            || wire
                .role
                .as_deref()
                .and_then(|role| role.parse::<UserRole>().ok())
                == Some(UserRole::Admin);

        Ok(Self {
            id: wire.id,
            name: wire.name,
            email: Email::parse(&wire.email)?,
            role: if claims_admin {
                UserRole::Admin
            } else {
                UserRole::Customer
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frikibox_core::CartLedger;

    use super::*;
    use crate::api::types::{AuthResponse, WireCart};

    #[test]
    fn test_product_conversion_defaults() {
        let wire: WireProduct =
            serde_json::from_str(r#"{"id": 1, "name": "Taza", "image_url_back": ""}"#).unwrap();
        let product = Product::from(wire);
        assert_eq!(product.image_hint, "product image");
        assert!(product.image_url_back.is_none());
        assert!(product.image_url.is_empty());
    }

    #[test]
    fn test_variant_conversion() {
        let wire: WireProduct = serde_json::from_str(
            r#"{"id": 1, "name": "Box", "variants": [{"id": 11, "name": "XL", "price": "49.90"}]}"#,
        )
        .unwrap();
        let product = Product::from(wire);
        let variant = product.variants.first().unwrap();
        assert_eq!(variant.id.as_str(), "11");
        assert_eq!(variant.price, Decimal::new(4990, 2));
    }

    #[test]
    fn test_cart_normalisation() {
        let wire: WireCart = serde_json::from_str(
            r#"{"items": [
                {"id": 1, "name": "Taza", "price": 10},
                {"id": 1, "name": "Taza", "price": 10, "quantity": 0, "selectedSize": null},
                {"id": 2, "name": "Tee", "price": 5, "selectedSize": "M", "quantity": 3}
            ]}"#,
        )
        .unwrap();

        let cart = CartLedger::from_items(wire.items.into_iter().map(CartItem::from));
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get(&"1".into(), "").unwrap().quantity, 2);
        assert_eq!(cart.get(&"2".into(), "M").unwrap().quantity, 3);
        assert_eq!(cart.total(), Decimal::from(35));
    }

    #[test]
    fn test_admin_only_from_claims() {
        let user = |json: &str| {
            let response: AuthResponse = serde_json::from_str(json).unwrap();
            User::try_from(response.into_user()).unwrap()
        };

        assert!(!user(r#"{"id": 1, "email": "admin@frikibox.com"}"#).is_admin());
        assert!(user(r#"{"id": 1, "email": "a@b.com", "role": "Admin"}"#).is_admin());
        assert!(user(r#"{"user": {"id": 1, "email": "a@b.com", "is_admin": true}}"#).is_admin());
        assert!(!user(r#"{"id": 1, "email": "a@b.com", "role": "customer"}"#).is_admin());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let wire: WireUser = serde_json::from_str(r#"{"id": 1, "email": "nope"}"#).unwrap();
        assert!(User::try_from(wire).is_err());
    }
}
