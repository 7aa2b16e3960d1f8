use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_core::{AppResult, UserId};
use sgi_domain::{EntityRef, TemporaryGrant};

/// Input for granting temporary access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTemporaryGrantInput {
    /// Grantee.
    pub user_id: UserId,
    /// Record to expose.
    pub entity: EntityRef,
    /// Exclusive expiry instant, must be in the future.
    pub expires_at: DateTime<Utc>,
}

/// Grant listing filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryGrantQuery {
    /// Restricts results to one grantee.
    pub user_id: Option<UserId>,
    /// When set, only grants still active at this instant are returned.
    pub active_at: Option<DateTime<Utc>>,
    /// Maximum number of grants.
    pub limit: usize,
    /// Number of grants to skip.
    pub offset: usize,
}

/// Repository port for temporary grant storage.
#[async_trait]
pub trait TemporaryGrantRepository: Send + Sync {
    /// Persists a new grant.
    async fn create_grant(&self, grant: &TemporaryGrant) -> AppResult<()>;

    /// Lists grants newest first.
    async fn list_grants(&self, query: TemporaryGrantQuery) -> AppResult<Vec<TemporaryGrant>>;

    /// Deletes grants whose expiry is at or before `now`, returning the count.
    async fn purge_expired_grants(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
