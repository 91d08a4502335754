//! Authentication service.
//!
//! Login and registration are validated locally, then delegated to the
//! remote auth endpoints. In [`AuthMode::Mock`] any well-formed input is
//! accepted and a throwaway customer identity is issued; mock users are never
//! admins.
//!
//! The role on the returned [`User`] only drives what the storefront shows.
//! Admin mutations must still be authorized by the remote service.

mod error;

pub use error::AuthError;

use chrono::Utc;

use frikibox_core::{Email, User, UserId, UserRole};

use crate::api::{ApiError, FrikiBoxClient};
use crate::config::AuthMode;

/// Display name given to mock logins, which carry no name.
const MOCK_LOGIN_NAME: &str = "Usuario Mock";

/// Authentication service.
pub struct AuthService<'a> {
    client: &'a FrikiBoxClient,
    mode: AuthMode,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: &'a FrikiBoxClient, mode: AuthMode) -> Self {
        Self { client, mode }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingPassword` for
    /// bad input, `AuthError::InvalidCredentials` when the service rejects
    /// the pair, and `AuthError::Remote` when the service fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        match self.mode {
            AuthMode::Mock => Ok(mock_user(MOCK_LOGIN_NAME, email)),
            AuthMode::Remote => self
                .client
                .login(email.as_str(), password)
                .await
                .map_err(|e| {
                    if e.is_rejection() {
                        AuthError::InvalidCredentials
                    } else {
                        AuthError::Remote(e)
                    }
                }),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingName`, `AuthError::InvalidEmail` or
    /// `AuthError::MissingPassword` for bad input,
    /// `AuthError::RegistrationRejected` when the service refuses, and
    /// `AuthError::Remote` when the service fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        match self.mode {
            AuthMode::Mock => Ok(mock_user(name, email)),
            AuthMode::Remote => self
                .client
                .register(name, email.as_str(), password)
                .await
                .map_err(|e| match e {
                    ApiError::Status { status, message } if (400..500).contains(&status) => {
                        AuthError::RegistrationRejected(if message.is_empty() {
                            "Registration rejected".to_string()
                        } else {
                            message
                        })
                    }
                    other => AuthError::Remote(other),
                }),
        }
    }
}

/// Passwords are checked by the auth service; locally we only require one.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

fn mock_user(name: &str, email: Email) -> User {
    User {
        id: UserId::new(format!("mock-{}", Utc::now().timestamp_millis())),
        name: name.to_string(),
        email,
        role: UserRole::Customer,
    }
}
