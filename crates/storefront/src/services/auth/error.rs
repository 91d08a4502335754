//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] frikibox_core::EmailError),

    /// Password was empty.
    #[error("password is required")]
    MissingPassword,

    /// Display name was empty.
    #[error("name is required")]
    MissingName,

    /// The auth service rejected the email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth service refused to create the account.
    #[error("registration rejected: {0}")]
    RegistrationRejected(String),

    /// The auth service could not be reached or answered garbage.
    #[error("auth service error: {0}")]
    Remote(#[source] ApiError),
}
