use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    TemporaryGrantQuery, TemporaryGrantRepository,
};
use sgi_core::{AppError, AppResult};
use sgi_domain::TemporaryGrant;
use uuid::Uuid;

use super::InMemoryStore;

#[async_trait]
impl TemporaryGrantRepository for InMemoryStore {
    async fn create_grant(&self, grant: &TemporaryGrant) -> AppResult<()> {
        if !self.users.read().await.contains_key(&grant.user_id) {
            return Err(AppError::Conflict(
                "temporary access grantee does not exist".to_owned(),
            ));
        }

        self.grants.write().await.push(grant.clone());
        Ok(())
    }

    async fn list_grants(&self, query: TemporaryGrantQuery) -> AppResult<Vec<TemporaryGrant>> {
        let mut grants: Vec<TemporaryGrant> = self
            .grants
            .read()
            .await
            .iter()
            .filter(|grant| query.user_id.is_none_or(|user_id| grant.user_id == user_id))
            .filter(|grant| query.active_at.is_none_or(|now| grant.expires_at > now))
            .cloned()
            .collect();
        grants.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(grants
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn purge_expired_grants(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut grants = self.grants.write().await;
        let before = grants.len();
        grants.retain(|grant| grant.expires_at > now);
        Ok((before - grants.len()) as u64)
    }
}

#[async_trait]
impl AuditRepository for InMemoryStore {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_entries.write().await.push(AuditLogEntry {
            id: Uuid::new_v4(),
            event,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.audit_entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .filter(|entry| query.matches(&entry.event))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
