//! The signed-in shopper.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole};

/// A signed-in user as held in the session.
///
/// `role` comes from the auth service's response. It only decides what the
/// storefront offers to show; the remote service must authorize admin
/// mutations on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    /// Whether the auth service granted the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_comes_from_role_only() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "name": "FrikiBOX", "email": "admin@frikibox.com"}"#,
        )
        .unwrap();
        assert!(!user.is_admin());

        let admin = User {
            role: UserRole::Admin,
            ..user
        };
        assert!(admin.is_admin());
    }
}
