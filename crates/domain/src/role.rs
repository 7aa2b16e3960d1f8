use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sgi_core::AppError;

/// Account role carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access, bypasses area scoping.
    Admin,
    /// Supervisor allowed to edit records in scope.
    Superuser,
    /// Read-only analyst.
    Analyst,
    /// Data-entry operator.
    User,
}

impl Role {
    /// Returns all supported roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Admin, Self::Superuser, Self::Analyst, Self::User]
    }

    /// Returns the stored role identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Superuser => "superuser",
            Self::Analyst => "analyst",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_parsing_ignores_case() {
        assert!(matches!("SuperUser".parse::<Role>(), Ok(Role::Superuser)));
        assert!(matches!("admin".parse::<Role>(), Ok(Role::Admin)));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("auditor".parse::<Role>().is_err());
    }
}
