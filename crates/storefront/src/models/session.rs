//! Per-visitor state stored in the session.
//!
//! Every request loads what it needs, mutates it and stores it back. Missing
//! or undecodable entries read as their empty default, so a session written
//! by an older build never breaks a page.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_sessions::Session;

use frikibox_core::{BoxBuilder, CartLedger, DragState, OrderHistory, User};

/// Session keys for visitor data.
pub mod keys {
    /// Key for the signed-in user.
    pub const AUTH_USER: &str = "auth_user";

    /// Key for the order-history mirror.
    pub const ORDERS: &str = "orders";

    /// Key for the cart ledger.
    pub const CART: &str = "cart";

    /// Key for the box being built.
    pub const GIFT_BOX: &str = "gift_box";

    /// Key for the product currently being dragged.
    pub const PICKED_ITEM: &str = "picked_item";
}

/// Typed access to one visitor's session data.
#[derive(Clone, Copy)]
pub struct Visitor<'a> {
    session: &'a Session,
}

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

impl<'a> Visitor<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> SessionResult<T> {
        match self.session.get::<T>(key).await {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!(key, error = %e, "Discarding undecodable session entry");
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T) -> SessionResult<()> {
        self.session.insert(key, value).await
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn user(&self) -> SessionResult<Option<User>> {
        self.load(keys::AUTH_USER).await
    }

    /// Record the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_user(&self, user: &User) -> SessionResult<()> {
        self.store(keys::AUTH_USER, user).await
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear_user(&self) -> SessionResult<()> {
        self.session.remove::<User>(keys::AUTH_USER).await?;
        Ok(())
    }

    /// The visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn cart(&self) -> SessionResult<CartLedger> {
        self.load(keys::CART).await
    }

    /// Store the visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_cart(&self, cart: &CartLedger) -> SessionResult<()> {
        self.store(keys::CART, cart).await
    }

    /// The box being built.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn gift_box(&self) -> SessionResult<BoxBuilder> {
        self.load(keys::GIFT_BOX).await
    }

    /// Store the box being built.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_gift_box(&self, gift_box: &BoxBuilder) -> SessionResult<()> {
        self.store(keys::GIFT_BOX, gift_box).await
    }

    /// The drag in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn drag(&self) -> SessionResult<DragState> {
        self.load(keys::PICKED_ITEM).await
    }

    /// Store the drag in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_drag(&self, drag: &DragState) -> SessionResult<()> {
        self.store(keys::PICKED_ITEM, drag).await
    }

    /// The order-history mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn orders(&self) -> SessionResult<OrderHistory> {
        self.load(keys::ORDERS).await
    }

    /// Store the order-history mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_orders(&self, orders: &OrderHistory) -> SessionResult<()> {
        self.store(keys::ORDERS, orders).await
    }
}
