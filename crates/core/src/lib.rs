//! FrikiBox Core - domain types and state machines.
//!
//! This crate holds everything about the storefront that does not touch the
//! network or the session store:
//!
//! - [`product`] and [`catalog`] - catalog products and listing filters
//! - [`gift_box`] - the "build your own box" configurator (capacity 6)
//! - [`cart`] - the cart ledger keyed by (product id, size)
//! - [`order`] - orders, checkout confirmations and the order history
//! - [`checkout`] - shipping address and pre-payment validation
//! - [`user`] - the signed-in shopper
//! - [`types`] - newtype IDs, prices, emails and statuses
//!
//! # Architecture
//!
//! No I/O, no HTTP clients, no clocks: operations that need the current time
//! take it as an argument. The storefront crate loads these values from the
//! visitor's session, mutates them, and stores them back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod gift_box;
pub mod order;
pub mod product;
pub mod types;
pub mod user;

pub use cart::{CartItem, CartLedger};
pub use checkout::{AddressError, CheckoutError, ShippingAddress, validate_checkout};
pub use gift_box::{
    AddOutcome, BOX_CAPACITY, BoxBuilder, BoxItem, CustomBox, DragState, PickError, box_key,
};
pub use order::{CheckoutConfirmation, ConfirmationLine, Order, OrderHistory, OrderLine};
pub use product::{CLOTHING, Product, Variant};
pub use types::*;
pub use user::User;
