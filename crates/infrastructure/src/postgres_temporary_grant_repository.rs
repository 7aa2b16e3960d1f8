use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use sgi_application::{TemporaryGrantQuery, TemporaryGrantRepository};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::{EntityKind, EntityRef, TemporaryGrant};
use tracing::debug;

use crate::postgres_errors::{conflict_or_internal, internal};
use crate::postgres_paging::page_window;

/// PostgreSQL-backed repository for temporary grants.
#[derive(Clone)]
pub struct PostgresTemporaryGrantRepository {
    pool: PgPool,
}

impl PostgresTemporaryGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TemporaryGrantRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    entity_id: uuid::Uuid,
    entity_type: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TemporaryGrantRow> for TemporaryGrant {
    type Error = AppError;

    fn try_from(row: TemporaryGrantRow) -> Result<Self, Self::Error> {
        let kind = EntityKind::from_str(row.entity_type.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode entity_type '{}' of grant '{}': {error}",
                row.entity_type, row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            entity: EntityRef::new(kind, row.entity_id),
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TemporaryGrantRepository for PostgresTemporaryGrantRepository {
    async fn create_grant(&self, grant: &TemporaryGrant) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO temporary_access (
                id,
                user_id,
                entity_id,
                entity_type,
                expires_at,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(grant.id)
        .bind(grant.user_id.as_uuid())
        .bind(grant.entity.id)
        .bind(grant.entity.kind.route_segment())
        .bind(grant.expires_at)
        .bind(grant.created_at)
        .bind(grant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "temporary access grantee does not exist",
                "create temporary access grant",
            )
        })?;

        Ok(())
    }

    async fn list_grants(&self, query: TemporaryGrantQuery) -> AppResult<Vec<TemporaryGrant>> {
        let window = page_window(query.limit, query.offset);

        let rows = sqlx::query_as::<_, TemporaryGrantRow>(
            r#"
            SELECT id, user_id, entity_id, entity_type, expires_at, created_at, updated_at
            FROM temporary_access
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::TIMESTAMPTZ IS NULL OR expires_at > $2)
            ORDER BY created_at DESC, id
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.user_id.map(|user_id| user_id.as_uuid()))
        .bind(query.active_at)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list temporary access grants"))?;

        rows.into_iter().map(TemporaryGrant::try_from).collect()
    }

    async fn purge_expired_grants(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM temporary_access
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(internal("purge expired temporary access grants"))?;

        let deleted = result.rows_affected();
        debug!(deleted, "expired temporary access grants purged");
        Ok(deleted)
    }
}
