//! Client for the remote FrikiBox catalog/order/auth service.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`, one method per remote endpoint
//! - The remote service is the source of truth for products, carts and orders
//! - Catalog reads are cached in memory via `moka` for a short TTL
//! - Wire payloads are decoded into tolerant DTOs (`types`) and converted into
//!   the `frikibox-core` domain types (`conversions`)
//!
//! # Example
//!
//! ```rust,ignore
//! use frikibox_storefront::api::FrikiBoxClient;
//!
//! let client = FrikiBoxClient::new(&config.api)?;
//! let products = client.products().await?;
//! let product = client.product(&products[0].id).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod types;

pub use client::FrikiBoxClient;

use thiserror::Error;

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Remote service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the body, if any.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field was absent from an otherwise valid response.
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    /// A field was present but unusable.
    #[error("Invalid `{field}` in response: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether the remote service rejected the request as a client error
    /// (4xx), as opposed to failing to serve it.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 400 && *status < 500)
            || matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = ApiError::Status {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Remote service returned 503: maintenance");
    }

    #[test]
    fn test_is_rejection() {
        let unauthorized = ApiError::Status {
            status: 401,
            message: String::new(),
        };
        assert!(unauthorized.is_rejection());

        let outage = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert!(!outage.is_rejection());
        assert!(!ApiError::MissingField("url").is_rejection());
    }
}
