use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::warn;

use sgi_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use sgi_core::{AppError, AppResult};
use sgi_domain::AuditAction;
use uuid::Uuid;

use crate::postgres_errors::internal;
use crate::postgres_paging::page_window;

/// Audit trail stored in `audit_log_entries`, serving both the write and read ports.
#[derive(Clone)]
pub struct PostgresAuditTrail {
    pool: PgPool,
}

impl PostgresAuditTrail {
    /// Creates a trail over the provided pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TrailRow {
    id: Uuid,
    subject: String,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrailRow> for AuditLogEntry {
    type Error = AppError;

    fn try_from(row: TrailRow) -> Result<Self, Self::Error> {
        let action = AuditAction::from_str(row.action.as_str()).map_err(|_| {
            warn!(entry = %row.id, action = %row.action, "unknown audit action in trail");
            AppError::Internal(format!("audit entry {} has unknown action", row.id))
        })?;

        Ok(Self {
            id: row.id,
            event: AuditEvent {
                subject: row.subject,
                action,
                resource_type: row.resource_type,
                resource_id: row.resource_id,
                detail: row.detail,
            },
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditTrail {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        let AuditEvent {
            subject,
            action,
            resource_type,
            resource_id,
            detail,
        } = event;

        sqlx::query(
            "INSERT INTO audit_log_entries (subject, action, resource_type, resource_id, detail) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(subject)
        .bind(action.as_str())
        .bind(resource_type)
        .bind(resource_id)
        .bind(detail)
        .execute(&self.pool)
        .await
        .map_err(internal("record audit event"))?;

        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditTrail {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, subject, action, resource_type, resource_id, detail, created_at \
             FROM audit_log_entries WHERE TRUE",
        );
        if let Some(action) = query.action {
            builder.push(" AND action = ").push_bind(action.as_str());
        }
        if let Some(subject) = query.subject {
            builder.push(" AND subject = ").push_bind(subject);
        }
        let window = page_window(query.limit, query.offset);
        builder
            .push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);

        builder
            .build_query_as::<TrailRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(internal("list audit log entries"))?
            .into_iter()
            .map(AuditLogEntry::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests;
