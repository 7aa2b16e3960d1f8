use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role name that bypasses area scoping.
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated actor resolved from a verified access token.
///
/// Immutable for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    role: String,
    area: String,
}

impl Principal {
    /// Creates a principal from verified token claims.
    #[must_use]
    pub fn new(user_id: UserId, role: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
            area: area.into(),
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role claim exactly as issued.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the principal's home area.
    #[must_use]
    pub fn area(&self) -> &str {
        self.area.as_str()
    }

    /// Returns whether the principal holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::Principal;
    use crate::UserId;

    #[test]
    fn admin_check_ignores_case() {
        let principal = Principal::new(UserId::new(), "Admin", "SEP");
        assert!(principal.is_admin());
    }

    #[test]
    fn analyst_is_not_admin() {
        let principal = Principal::new(UserId::new(), "analyst", "CI2");
        assert!(!principal.is_admin());
        assert_eq!(principal.area(), "CI2");
    }
}
