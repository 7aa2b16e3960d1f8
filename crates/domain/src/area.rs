use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use sgi_core::{AppError, AppResult};

/// Areas present in a freshly migrated catalog.
pub const DEFAULT_AREAS: [&str; 5] = ["SEP", "CI2", "TIC", "CI2 ESPECIAL", "Despacho"];

/// Maximum length of an area name.
pub const AREA_NAME_MAX_LENGTH: usize = 64;

/// Validated organizational area name.
///
/// Names are compared case-insensitively inside the catalog but stored with
/// the casing the administrator chose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaName(String);

impl AreaName {
    /// Creates a validated area name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("area must not be empty".to_owned()));
        }

        if trimmed.chars().count() > AREA_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "area must not exceed {AREA_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the area name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether two names denote the same catalog entry.
    #[must_use]
    pub fn same_entry(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl Display for AreaName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<AreaName> for String {
    fn from(value: AreaName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::AreaName;

    #[test]
    fn area_name_is_trimmed() {
        let area = AreaName::new("  CI2 ESPECIAL ");
        assert!(matches!(area, Ok(ref value) if value.as_str() == "CI2 ESPECIAL"));
    }

    #[test]
    fn area_name_rejects_blank() {
        assert!(AreaName::new("  ").is_err());
    }

    #[test]
    fn catalog_entries_match_ignoring_case() {
        let Ok(area) = AreaName::new("Despacho") else {
            panic!("area should be valid");
        };
        assert!(area.same_entry("DESPACHO"));
        assert!(!area.same_entry("SEP"));
    }
}
