//! Authentication route handlers.
//!
//! Signing in or out always starts the visitor on a fresh cart and order
//! mirror. A signed-in visitor then gets their stored cart back from the
//! remote service.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frikibox_core::{CartLedger, OrderHistory, User};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::OptionalUser;
use crate::models::Visitor;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Login request.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The signed-in user as shown to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub is_admin: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            is_admin: user.is_admin(),
            user,
        }
    }
}

/// Response to login and registration.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserView,
    pub cart: CartView,
}

/// Response to "who am I".
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Option<UserView>,
}

/// Put `user` in the session with their remote cart.
async fn start_session(
    state: &AppState,
    session: &Session,
    user: User,
) -> Result<Json<SessionResponse>> {
    session.cycle_id().await?;

    let visitor = Visitor::new(session);
    visitor.set_user(&user).await?;
    visitor.set_orders(&OrderHistory::default()).await?;

    let cart = match state.cart_mirror().load(&user).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load stored cart, starting empty");
            CartLedger::new()
        }
    };
    visitor.set_cart(&cart).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, items = cart.item_count(), "User signed in");

    Ok(Json(SessionResponse {
        cart: CartView::from(&cart),
        user: user.into(),
    }))
}

/// Sign in with email and password.
#[instrument(skip(state, session, req))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let user = state.auth().login(&req.email, &req.password).await?;
    start_session(&state, &session, user).await
}

/// Create an account and sign in.
#[instrument(skip(state, session, req))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>> {
    let user = state
        .auth()
        .register(&req.name, &req.email, &req.password)
        .await?;
    start_session(&state, &session, user).await
}

/// Sign out. The cart and order mirror go with the user.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    let visitor = Visitor::new(&session);
    visitor.clear_user().await?;
    visitor.set_cart(&CartLedger::new()).await?;
    visitor.set_orders(&OrderHistory::default()).await?;

    clear_sentry_user();
    tracing::info!("User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user, if any.
pub async fn me(OptionalUser(user): OptionalUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: user.map(UserView::from),
    })
}
