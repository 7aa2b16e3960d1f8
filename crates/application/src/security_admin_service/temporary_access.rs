use chrono::{DateTime, Utc};
use sgi_core::{AppError, AppResult, Principal, UserId};
use sgi_domain::{AuditAction, TemporaryGrant};
use tracing::info;
use uuid::Uuid;

use crate::{CreateTemporaryGrantInput, TemporaryGrantQuery};

use super::{AdminAuditEvent, SecurityAdminService, page_size};

/// Grant listing input as received from transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTemporaryGrantsInput {
    /// Restricts results to one grantee.
    pub user_id: Option<UserId>,
    /// Hides expired grants.
    pub active_only: bool,
    /// Requested page size.
    pub limit: Option<usize>,
    /// Requested offset.
    pub offset: Option<usize>,
}

impl SecurityAdminService {
    /// Grants a user temporary access to one record.
    pub async fn create_temporary_grant(
        &self,
        actor: &Principal,
        input: CreateTemporaryGrantInput,
    ) -> AppResult<TemporaryGrant> {
        self.create_temporary_grant_at(actor, input, Utc::now())
            .await
    }

    /// Grants temporary access, validating expiry against `now`.
    pub async fn create_temporary_grant_at(
        &self,
        actor: &Principal,
        input: CreateTemporaryGrantInput,
        now: DateTime<Utc>,
    ) -> AppResult<TemporaryGrant> {
        self.require_admin(actor)?;

        if input.expires_at <= now {
            return Err(AppError::Validation(
                "expires_at must be in the future".to_owned(),
            ));
        }

        self.access_control
            .require_entity_area(input.entity)
            .await?;

        if self
            .user_repository
            .find_by_id(input.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                input.user_id
            )));
        }

        let grant = TemporaryGrant {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            entity: input.entity,
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        };
        self.grant_repository.create_grant(&grant).await?;

        info!(
            grant_id = %grant.id,
            user_id = %grant.user_id,
            entity = %grant.entity,
            expires_at = %grant.expires_at,
            "temporary access granted"
        );

        self.append_audit(
            actor,
            AdminAuditEvent {
                action: AuditAction::TemporaryAccessGranted,
                resource_type: "temporary_access",
                resource_id: grant.id.to_string(),
                detail: Some(format!(
                    "granted user '{}' access to {} until '{}'",
                    grant.user_id,
                    grant.entity,
                    grant.expires_at.to_rfc3339()
                )),
            },
        )
        .await?;

        Ok(grant)
    }

    /// Lists temporary grants.
    pub async fn list_temporary_grants(
        &self,
        actor: &Principal,
        input: ListTemporaryGrantsInput,
    ) -> AppResult<Vec<TemporaryGrant>> {
        self.require_admin(actor)?;

        self.grant_repository
            .list_grants(TemporaryGrantQuery {
                user_id: input.user_id,
                active_at: input.active_only.then(Utc::now),
                limit: page_size(input.limit),
                offset: input.offset.unwrap_or(0),
            })
            .await
    }

    /// Deletes grants that have expired, returning how many were removed.
    pub async fn purge_expired_grants(&self, actor: &Principal) -> AppResult<u64> {
        self.require_admin(actor)?;

        let now = Utc::now();
        let purged = self.grant_repository.purge_expired_grants(now).await?;
        info!(purged, "expired temporary access grants purged");

        self.append_audit(
            actor,
            AdminAuditEvent {
                action: AuditAction::TemporaryAccessPurged,
                resource_type: "temporary_access",
                resource_id: "expired".to_owned(),
                detail: Some(format!("purged {purged} expired grants")),
            },
        )
        .await?;

        Ok(purged)
    }
}
