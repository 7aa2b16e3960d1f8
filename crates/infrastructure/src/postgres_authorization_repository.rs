use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sgi_application::AuthorizationRepository;
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::{EntityRef, TemporaryGrant};

use crate::postgres_temporary_grant_repository::TemporaryGrantRow;

/// PostgreSQL-backed repository for access decision lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn find_entity_area(&self, entity: EntityRef) -> AppResult<Option<String>> {
        // Table names come from the closed entity kind enum.
        let statement = format!("SELECT area FROM {} WHERE id = $1", entity.kind.as_str());

        sqlx::query_scalar::<_, String>(statement.as_str())
            .bind(entity.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to resolve area of {entity}: {error}"))
            })
    }

    async fn find_active_temporary_grant(
        &self,
        user_id: UserId,
        entity: EntityRef,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TemporaryGrant>> {
        let row = sqlx::query_as::<_, TemporaryGrantRow>(
            r#"
            SELECT id, user_id, entity_id, entity_type, expires_at, created_at, updated_at
            FROM temporary_access
            WHERE user_id = $1
              AND entity_id = $2
              AND lower(entity_type) IN ($3, $4)
              AND expires_at > $5
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(entity.id)
        .bind(entity.kind.route_segment())
        .bind(entity.kind.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve temporary grant for user '{user_id}' on {entity}: {error}"
            ))
        })?;

        row.map(TemporaryGrant::try_from).transpose()
    }
}
