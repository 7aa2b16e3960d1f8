pub mod auth;
pub mod health;
pub mod records;
pub mod reports;
pub mod security;
pub mod users;

use std::str::FromStr;

use sgi_core::{AppError, AppResult};
use uuid::Uuid;

/// Parses an identifier taken from the URL path.
///
/// A malformed id cannot name a stored row, so it reads as missing.
fn path_id(value: &str, not_found_message: &str) -> AppResult<Uuid> {
    Uuid::from_str(value.trim()).map_err(|_| AppError::NotFound(not_found_message.to_owned()))
}

/// Parses an identifier supplied in a request body or query string.
fn input_id(value: &str, field: &str) -> AppResult<Uuid> {
    Uuid::from_str(value.trim())
        .map_err(|_| AppError::Validation(format!("{field} must be a valid UUID")))
}
