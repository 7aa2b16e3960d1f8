use std::ops::RangeInclusive;

use sgi_core::{AppError, AppResult};

use crate::Role;

/// Accepted case rating values.
pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

/// Per-role rating attribute on a case.
///
/// Each reviewing role owns one slot and never overwrites another role's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSlot {
    /// Written by admins.
    Director,
    /// Written by analysts.
    Analyst,
    /// Written by superusers.
    Coordinator,
}

impl RatingSlot {
    /// Returns the slot owned by `role`, if it rates cases at all.
    #[must_use]
    pub const fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Admin => Some(Self::Director),
            Role::Analyst => Some(Self::Analyst),
            Role::Superuser => Some(Self::Coordinator),
            Role::User => None,
        }
    }

    /// Returns the case attribute backing this slot.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Director => "vdirector",
            Self::Analyst => "vanalista",
            Self::Coordinator => "vcoordinador",
        }
    }
}

/// Rejects ratings outside [`RATING_RANGE`].
pub fn validate_rating(value: i64) -> AppResult<i64> {
    if RATING_RANGE.contains(&value) {
        return Ok(value);
    }

    Err(AppError::Validation(format!(
        "rating must be between {} and {}",
        RATING_RANGE.start(),
        RATING_RANGE.end()
    )))
}
