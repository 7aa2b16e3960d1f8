//! In-memory adapter implementing every storage port.
//!
//! Mirrors the PostgreSQL constraints that services rely on: case-insensitive
//! area and email uniqueness, per-kind unique record fields, cascading area
//! renames and removal refused while an area is in use.

use std::collections::{BTreeMap, HashMap};

use sgi_application::{AuditLogEntry, UserRecord};
use sgi_core::UserId;
use sgi_domain::{AreaName, EntityRef, ProtectedRecord, RecordLink, TemporaryGrant};
use tokio::sync::RwLock;

mod accounts;
mod records;
mod security;

/// In-memory storage used by tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    areas: RwLock<Vec<AreaName>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
    records: RwLock<BTreeMap<EntityRef, ProtectedRecord>>,
    links: RwLock<Vec<RecordLink>>,
    grants: RwLock<Vec<TemporaryGrant>>,
    audit_entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryStore {
    /// Creates an empty store with no areas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given area catalog.
    #[must_use]
    pub fn with_areas(areas: Vec<AreaName>) -> Self {
        Self {
            areas: RwLock::new(areas),
            ..Self::default()
        }
    }
}
