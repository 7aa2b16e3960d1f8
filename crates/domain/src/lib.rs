//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod area;
mod entity;
mod grant;
mod rating;
mod report;
mod role;
mod security;
mod user;

pub use area::{AREA_NAME_MAX_LENGTH, AreaName, DEFAULT_AREAS};
pub use entity::{
    EntityKind, EntityRef, FieldKind, FieldSpec, ProtectedRecord, RESERVED_ATTRIBUTE_KEYS,
    RecordAttributes, RecordLink, canonical_timestamp,
};
pub use grant::{GrantState, TemporaryGrant};
pub use rating::{RATING_RANGE, RatingSlot, validate_rating};
pub use report::{MODALIDAD_FIELD, MODALIDAD_KINDS, REPORT_DATE_FORMAT, ReportPeriod};
pub use role::Role;
pub use security::AuditAction;
pub use user::{EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, validate_password};
