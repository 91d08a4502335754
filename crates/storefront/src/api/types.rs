//! Wire types for the remote FrikiBox service.
//!
//! The service is not consistent about field naming (`image_url` on listings,
//! `imageUrl` on carts) nor about value types (ids and prices arrive as
//! numbers or strings, size lists as arrays or JSON-encoded strings). These
//! DTOs accept every shape seen in practice; one malformed optional field
//! never fails a whole catalog listing.

use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

use frikibox_core::{BoxItem, CartLedger, Product, ProductId, ShippingAddress, UserId, VariantId};

// =============================================================================
// Incoming
// =============================================================================

/// A product as returned by `/products/all` and `/products/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, alias = "available_sizes", deserialize_with = "string_list")]
    pub available_sizes: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub variants: Vec<WireVariant>,
    #[serde(default, alias = "image_url", deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, alias = "image_url_back", deserialize_with = "lenient")]
    pub image_url_back: Option<String>,
    #[serde(default, alias = "image_hint", deserialize_with = "lenient")]
    pub image_hint: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, alias = "main_franchise", deserialize_with = "lenient")]
    pub main_franchise: Option<String>,
    #[serde(default, alias = "franchise_category", deserialize_with = "lenient")]
    pub franchise_category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub stock: Option<i64>,
}

/// A priced variant of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct WireVariant {
    pub id: VariantId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// A cart line as stored by `/cart/{uid}`: product fields flattened next to
/// the line fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartItem {
    #[serde(flatten)]
    pub product: WireProduct,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<u32>,
    #[serde(default, alias = "selected_size", deserialize_with = "lenient")]
    pub selected_size: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub contains: Vec<BoxItem>,
}

/// Body of `GET /cart/{uid}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCart {
    #[serde(default)]
    pub items: Vec<WireCartItem>,
}

/// A user as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    #[serde(alias = "uid", alias = "_id")]
    pub id: UserId,
    #[serde(default, alias = "displayName", deserialize_with = "lenient")]
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, alias = "is_admin", deserialize_with = "lenient")]
    pub is_admin: Option<bool>,
}

/// Body of the auth endpoints: `{user: {...}}`, or the user object itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthResponse {
    Wrapped { user: WireUser },
    Bare(WireUser),
}

impl AuthResponse {
    /// The user, whichever shape the service used.
    #[must_use]
    pub fn into_user(self) -> WireUser {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Body of `GET /orders/my-orders`: a bare array or `{orders: [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrdersResponse {
    List(Vec<frikibox_core::Order>),
    Wrapped { orders: Vec<frikibox_core::Order> },
}

impl OrdersResponse {
    #[must_use]
    pub fn into_orders(self) -> Vec<frikibox_core::Order> {
        match self {
            Self::List(orders) | Self::Wrapped { orders } => orders,
        }
    }
}

/// Body of `POST /payments/payment`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Error body of a non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

// =============================================================================
// Outgoing
// =============================================================================

/// A cart line in the flattened shape the service stores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingCartItem<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub quantity: u32,
    pub selected_size: &'a str,
    #[serde(skip_serializing_if = "no_items")]
    pub contains: &'a [BoxItem],
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by serde
const fn no_items(items: &&[BoxItem]) -> bool {
    items.is_empty()
}

impl<'a> OutgoingCartItem<'a> {
    /// Borrow every line of a cart.
    #[must_use]
    pub fn from_cart(cart: &'a CartLedger) -> Vec<Self> {
        cart.items()
            .iter()
            .map(|item| Self {
                product: &item.product,
                quantity: item.quantity,
                selected_size: &item.selected_size,
                contains: &item.contains,
            })
            .collect()
    }
}

/// Body of `POST /cart/{uid}`.
#[derive(Debug, Serialize)]
pub struct SaveCartRequest<'a> {
    pub items: Vec<OutgoingCartItem<'a>>,
}

/// Body of `POST /payments/payment`.
#[derive(Debug, Serialize)]
pub struct PaymentRequest<'a> {
    pub cart: Vec<OutgoingCartItem<'a>>,
    pub address: &'a ShippingAddress,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// =============================================================================
// Lenient field decoders
// =============================================================================

/// Decode a field, falling back to its default when the value has the wrong
/// type or is `null`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a price given as a JSON number or a numeric string.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Decode a list of strings given as an array, a JSON-encoded array string,
/// or a comma-separated string.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        serde_json::Value::String(s) => serde_json::from_str::<Vec<String>>(&s).unwrap_or_else(|_| {
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        }),
        _ => Vec::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_shape() {
        let product: WireProduct = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Camiseta Jedi",
                "price": "19.99",
                "image_url": "https://cdn/jedi.png",
                "category": "clothing",
                "availableSizes": "[\"S\",\"M\"]",
                "tags": "star wars, ropa",
                "main_franchise": "Star Wars",
                "franchise_category": "Cine",
                "stock": "many"
            }"#,
        )
        .unwrap();

        assert_eq!(product.id.as_str(), "7");
        assert_eq!(product.price, Some(Decimal::new(1999, 2)));
        assert_eq!(product.image_url.as_deref(), Some("https://cdn/jedi.png"));
        assert_eq!(product.available_sizes, ["S", "M"]);
        assert_eq!(product.tags, ["star wars", "ropa"]);
        assert_eq!(product.main_franchise.as_deref(), Some("Star Wars"));
        assert_eq!(product.stock, None);
    }

    #[test]
    fn test_null_fields_fall_back() {
        let product: WireProduct = serde_json::from_str(
            r#"{"id": "x", "name": null, "price": null, "tags": null, "variants": null}"#,
        )
        .unwrap();
        assert!(product.name.is_empty());
        assert!(product.price.is_none());
        assert!(product.tags.is_empty());
        assert!(product.variants.is_empty());
    }

    #[test]
    fn test_cart_item_flattened() {
        let cart: WireCart = serde_json::from_str(
            r#"{"items": [
                {"id": 1, "name": "Taza", "price": 10, "imageUrl": "/t.png", "quantity": 2},
                {"id": 2, "name": "Tee", "price": 5, "selectedSize": "M", "quantity": 0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, Some(2));
        assert_eq!(cart.items[1].selected_size.as_deref(), Some("M"));
        assert_eq!(cart.items[0].product.image_url.as_deref(), Some("/t.png"));
    }

    #[test]
    fn test_auth_response_shapes() {
        let wrapped: AuthResponse = serde_json::from_str(
            r#"{"user": {"uid": "u1", "name": "Ana", "email": "ana@frikibox.com", "role": "admin"}}"#,
        )
        .unwrap();
        let user = wrapped.into_user();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.role.as_deref(), Some("admin"));

        let bare: AuthResponse = serde_json::from_str(
            r#"{"id": 5, "email": "b@frikibox.com", "isAdmin": true}"#,
        )
        .unwrap();
        let user = bare.into_user();
        assert_eq!(user.id.as_str(), "5");
        assert_eq!(user.is_admin, Some(true));
    }

    #[test]
    fn test_outgoing_cart_is_flat() {
        let mut cart = CartLedger::new();
        cart.add(&Product::new("1", "Taza", Some(Decimal::TEN)), "");

        let body = serde_json::to_value(SaveCartRequest {
            items: OutgoingCartItem::from_cart(&cart),
        })
        .unwrap();

        let item = &body["items"][0];
        assert_eq!(item["id"], "1");
        assert_eq!(item["name"], "Taza");
        assert_eq!(item["quantity"], 1);
        assert_eq!(item["selectedSize"], "");
        assert!(item.get("contains").is_none());
    }
}
