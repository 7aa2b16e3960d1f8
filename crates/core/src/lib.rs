//! Shared primitives for all Rust crates in SGI.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::Principal;

/// Result alias over [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Identifier of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Details attached to an area-scoped denial.
///
/// Carries the area and display name of the entity the principal was refused,
/// so the transport layer can report them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenial {
    /// Human-readable denial message.
    pub message: String,
    /// Area stored on the refused entity.
    pub entity_area: String,
    /// Display name of the refused entity kind.
    pub entity_name: String,
}

impl Display for AccessDenial {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} (area: {}, entity: {})",
            self.message, self.entity_area, self.entity_name
        )
    }
}

/// Failure categories shared by every SGI layer. The API maps each to one HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected input, such as an unknown area or a malformed email.
    #[error("validation error: {0}")]
    Validation(String),

    /// The record, user or grant does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique field is taken or the target is still referenced.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No usable credentials were presented.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The entity belongs to another area and no grant covers it.
    #[error("forbidden: {0}")]
    AreaForbidden(AccessDenial),

    /// Storage or infrastructure failure. Never shown verbatim to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error is one of the forbidden variants.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::AreaForbidden(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessDenial, AppError, NonEmptyString, UserId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_trims_value() {
        let result = NonEmptyString::new("  SEP ");
        assert!(matches!(result, Ok(value) if value.as_str() == "SEP"));
    }

    #[test]
    fn user_id_formats_as_uuid() {
        let user_id = UserId::new();
        assert_eq!(user_id.to_string().len(), 36);
    }

    #[test]
    fn area_denial_counts_as_forbidden() {
        let error = AppError::AreaForbidden(AccessDenial {
            message: "You do not have access to this resource".to_owned(),
            entity_area: "SEP".to_owned(),
            entity_name: "Persona".to_owned(),
        });

        assert!(error.is_forbidden());
        assert!(error.to_string().contains("area: SEP"));
    }
}
