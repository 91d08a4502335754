//! Remote mirroring of the cart ledger.
//!
//! Only signed-in visitors have their cart stored remotely, keyed by user id.
//! Anonymous carts live in the session alone and are never sent anywhere.

use serde::Serialize;
use tracing::instrument;

use frikibox_core::{CartLedger, User};

use crate::api::{ApiError, FrikiBoxClient};

/// What happened to the remote copy after a cart change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorStatus {
    /// Anonymous visitor; nothing was sent.
    Local,
    /// The remote copy now matches.
    Synced,
    /// The save failed; the session copy still holds the change.
    Failed,
}

/// Loads and saves a signed-in visitor's cart.
pub struct CartMirror<'a> {
    client: &'a FrikiBoxClient,
}

impl<'a> CartMirror<'a> {
    #[must_use]
    pub const fn new(client: &'a FrikiBoxClient) -> Self {
        Self { client }
    }

    /// Push `cart` to the remote store when someone is signed in.
    ///
    /// Failures are logged and reported, never propagated: the local change
    /// stands either way.
    #[instrument(skip(self, user, cart), fields(user_id = user.map(|u| u.id.as_str())))]
    pub async fn save(&self, user: Option<&User>, cart: &CartLedger) -> MirrorStatus {
        let Some(user) = user else {
            return MirrorStatus::Local;
        };

        match self.client.save_cart(&user.id, cart).await {
            Ok(()) => MirrorStatus::Synced,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to mirror cart");
                MirrorStatus::Failed
            }
        }
    }

    /// Fetch the stored cart of a user who just signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn load(&self, user: &User) -> Result<CartLedger, ApiError> {
        self.client.load_cart(&user.id).await
    }
}
