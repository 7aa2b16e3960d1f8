use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sgi_core::UserId;
use uuid::Uuid;

use crate::EntityRef;

/// Lifecycle state of a temporary grant, derived from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantState {
    /// `now < expires_at`.
    Active,
    /// Expiry has passed; the grant never matches again.
    Expired,
}

impl GrantState {
    /// Returns the stable state identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// Time-boxed exception letting one principal bypass area scoping for one record.
///
/// Grants are created by administrators and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryGrant {
    /// Grant identifier.
    pub id: Uuid,
    /// Grantee.
    pub user_id: UserId,
    /// Record the grantee may access.
    pub entity: EntityRef,
    /// Exclusive expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TemporaryGrant {
    /// Returns the grant state at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> GrantState {
        if now < self.expires_at {
            GrantState::Active
        } else {
            GrantState::Expired
        }
    }

    /// Returns whether the grant admits `user_id` to `entity` at `now`.
    #[must_use]
    pub fn admits(&self, user_id: UserId, entity: EntityRef, now: DateTime<Utc>) -> bool {
        self.user_id == user_id
            && self.entity == entity
            && self.state_at(now) == GrantState::Active
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sgi_core::UserId;
    use uuid::Uuid;

    use super::{GrantState, TemporaryGrant};
    use crate::{EntityKind, EntityRef};

    fn grant_expiring_in(minutes: i64) -> TemporaryGrant {
        let now = Utc::now();
        TemporaryGrant {
            id: Uuid::new_v4(),
            user_id: UserId::new(),
            entity: EntityRef::new(EntityKind::Persona, Uuid::new_v4()),
            expires_at: now + Duration::minutes(minutes),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn grant_is_active_before_expiry_and_expired_at_expiry() {
        let grant = grant_expiring_in(60);
        assert_eq!(grant.state_at(grant.created_at), GrantState::Active);
        assert_eq!(grant.state_at(grant.expires_at), GrantState::Expired);
    }

    #[test]
    fn grant_only_admits_matching_user_and_entity() {
        let grant = grant_expiring_in(60);
        let now = grant.created_at;
        let other_kind = EntityRef::new(EntityKind::Caso, grant.entity.id);

        assert!(grant.admits(grant.user_id, grant.entity, now));
        assert!(!grant.admits(UserId::new(), grant.entity, now));
        assert!(!grant.admits(grant.user_id, other_kind, now));
    }
}
