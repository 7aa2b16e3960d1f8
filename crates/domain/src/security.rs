use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sgi_core::AppError;

/// Stable audit action names for administrative and record mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Emitted when a protected record is created.
    RecordCreated,
    /// Emitted when a protected record is updated.
    RecordUpdated,
    /// Emitted when a protected record is deleted.
    RecordDeleted,
    /// Emitted when two records are cross-referenced.
    RecordLinked,
    /// Emitted when a cross-reference is removed.
    RecordUnlinked,
    /// Emitted when a reviewer rates a case.
    RecordRated,
    /// Emitted when an administrator grants temporary access.
    TemporaryAccessGranted,
    /// Emitted when expired grants are purged.
    TemporaryAccessPurged,
    /// Emitted when an area is added to the catalog.
    AreaCreated,
    /// Emitted when an area is renamed.
    AreaRenamed,
    /// Emitted when an area is removed from the catalog.
    AreaRemoved,
    /// Emitted when a user account is created.
    UserCreated,
    /// Emitted when a user account is updated.
    UserUpdated,
    /// Emitted when a user account is deleted.
    UserDeleted,
    /// Emitted when an administrator resets a password.
    UserPasswordReset,
}

impl AuditAction {
    /// Returns all audit actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::RecordCreated,
            Self::RecordUpdated,
            Self::RecordDeleted,
            Self::RecordLinked,
            Self::RecordUnlinked,
            Self::RecordRated,
            Self::TemporaryAccessGranted,
            Self::TemporaryAccessPurged,
            Self::AreaCreated,
            Self::AreaRenamed,
            Self::AreaRemoved,
            Self::UserCreated,
            Self::UserUpdated,
            Self::UserDeleted,
            Self::UserPasswordReset,
        ]
    }

    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordCreated => "record.created",
            Self::RecordUpdated => "record.updated",
            Self::RecordDeleted => "record.deleted",
            Self::RecordLinked => "record.linked",
            Self::RecordUnlinked => "record.unlinked",
            Self::RecordRated => "record.rated",
            Self::TemporaryAccessGranted => "security.temporary_access.granted",
            Self::TemporaryAccessPurged => "security.temporary_access.purged",
            Self::AreaCreated => "configuration.area.created",
            Self::AreaRenamed => "configuration.area.renamed",
            Self::AreaRemoved => "configuration.area.removed",
            Self::UserCreated => "security.user.created",
            Self::UserUpdated => "security.user.updated",
            Self::UserDeleted => "security.user.deleted",
            Self::UserPasswordReset => "security.user.password_reset",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown audit action '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuditAction;

    #[test]
    fn audit_action_storage_values_are_unique() {
        let mut values: Vec<&str> = AuditAction::all().iter().map(AuditAction::as_str).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), AuditAction::all().len());
    }

    #[test]
    fn unknown_audit_action_is_rejected() {
        assert!(AuditAction::from_str("record.exported").is_err());
    }
}
