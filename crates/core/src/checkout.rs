//! Checkout input validation.

use serde::{Deserialize, Serialize};

use crate::cart::CartLedger;

/// Where the order is shipped. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

/// Rejected address, listing the blank fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing address fields: {}", .0.join(", "))]
pub struct AddressError(pub Vec<&'static str>);

impl ShippingAddress {
    /// Check that no field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] naming every blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            ("fullName", &self.full_name),
            ("street", &self.street),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];

        let missing: Vec<&'static str> = fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AddressError(missing))
        }
    }
}

/// Reasons a checkout cannot start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Validate everything that must hold before the payment processor is called.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] first, then any address problem.
pub fn validate_checkout(
    cart: &CartLedger,
    address: &ShippingAddress,
) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    address.validate()?;
    Ok(())
}
