//! Status enums for orders and users.

use serde::{Deserialize, Serialize};

/// Order status as reported by the remote order service.
///
/// The order service reports statuses either in English or in Spanish.
/// Unrecognised values deserialize to [`OrderStatus::Unknown`] rather than
/// failing the whole order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "Pending", alias = "pendiente", alias = "Pendiente")]
    Pending,
    #[serde(alias = "Paid", alias = "pagado", alias = "Pagado")]
    Paid,
    #[serde(alias = "Shipped", alias = "enviado", alias = "Enviado")]
    Shipped,
    #[serde(alias = "Delivered", alias = "entregado", alias = "Entregado")]
    Delivered,
    #[serde(alias = "Cancelled", alias = "cancelado", alias = "Cancelado")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Role claim issued by the auth service.
///
/// Only used to decide what the storefront shows. The remote service is
/// responsible for enforcing admin permissions on its own endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" | "user" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}
