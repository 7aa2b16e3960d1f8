use sgi_core::AppError;

/// Constraint class behind a rejected write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    /// SQLSTATE `23505`.
    Unique,
    /// SQLSTATE `23503`: the row references, or is referenced by, a missing or live row.
    ForeignKey,
}

impl Violation {
    pub(crate) fn of(error: &sqlx::Error) -> Option<Self> {
        let sqlx::Error::Database(database_error) = error else {
            return None;
        };

        match database_error.code().as_deref() {
            Some("23505") => Some(Self::Unique),
            Some("23503") => Some(Self::ForeignKey),
            _ => None,
        }
    }
}

/// Maps a write failure, turning unique and foreign-key violations into `Conflict`.
pub(crate) fn conflict_or_internal(
    error: sqlx::Error,
    conflict_message: &str,
    operation: &str,
) -> AppError {
    match Violation::of(&error) {
        Some(_) => AppError::Conflict(conflict_message.to_owned()),
        None => AppError::Internal(format!("failed to {operation}: {error}")),
    }
}

pub(crate) fn internal(operation: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |error| AppError::Internal(format!("failed to {operation}: {error}"))
}

/// Message used by every store when a write names an area missing from the catalog.
pub(crate) fn missing_area_message(area: &str) -> String {
    format!("area '{area}' does not exist")
}
