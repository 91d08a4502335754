//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login and registration (remote auth endpoints or mock backend)
//! - `cart_mirror` - Remote copy of a signed-in visitor's cart

pub mod auth;
pub mod cart_mirror;

pub use auth::{AuthError, AuthService};
pub use cart_mirror::{CartMirror, MirrorStatus};
