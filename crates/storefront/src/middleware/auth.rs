//! Authentication extractors.
//!
//! The user is read from the session under `auth_user`. `RequireAdmin` checks
//! the role claim issued by the auth service; it hides admin features from
//! other visitors but the remote service must still authorize the calls.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use frikibox_core::User;

use crate::error::AppError;
use crate::models::session_keys;

const LOGIN_REQUIRED: &str = "Login required";
const ADMIN_REQUIRED: &str = "Admin access required";

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Orders for {}", user.email)
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a signed-in user holding the admin role.
pub struct RequireAdmin(pub User);

/// Extractor that optionally gets the signed-in user.
///
/// Never rejects; anonymous visitors get `None`.
pub struct OptionalUser(pub Option<User>);

async fn session_user(parts: &Parts) -> Result<Option<User>, AppError> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

    Ok(session
        .get::<User>(session_keys::AUTH_USER)
        .await
        .ok()
        .flatten())
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts)
            .await?
            .ok_or_else(|| AppError::Unauthorized(LOGIN_REQUIRED.to_string()))?;

        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin user attempted admin access");
            return Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()));
        }

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await.ok().flatten()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    use frikibox_core::{Email, UserId, UserRole};

    use super::*;
    use crate::middleware::session::MokaSessionStore;

    async fn parts_with(user: Option<User>) -> Parts {
        let session = Session::new(None, Arc::new(MokaSessionStore::default()), None);
        if let Some(user) = user {
            session.insert(session_keys::AUTH_USER, user).await.unwrap();
        }
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        parts
    }

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new("u1"),
            name: "Ana".into(),
            email: Email::parse("ana@frikibox.com").unwrap(),
            role,
        }
    }

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn test_require_user_rejects_anonymous() {
        let mut parts = parts_with(None).await;
        let err = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_admin_checks_role() {
        let mut parts = parts_with(Some(user(UserRole::Customer))).await;
        let err = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(status(err), StatusCode::FORBIDDEN);

        let mut parts = parts_with(Some(user(UserRole::Admin))).await;
        let RequireAdmin(admin) = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_internal_error() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        let err = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(status(err), StatusCode::INTERNAL_SERVER_ERROR);

        let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
