//! Session-backed models for the storefront.

pub mod session;

pub use session::{Visitor, keys as session_keys};
