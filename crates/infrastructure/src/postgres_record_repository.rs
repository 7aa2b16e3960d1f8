//! PostgreSQL-backed protected record repository.
//!
//! Each entity kind lives in its own table holding the common columns and a
//! JSONB `attributes` document. Per-field uniqueness is enforced by partial
//! expression indexes declared in the migrations.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use sgi_application::{RecordCount, RecordCountQuery, RecordQuery, RecordRepository};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::{EntityKind, EntityRef, ProtectedRecord, RecordAttributes, RecordLink};

use crate::postgres_errors::{Violation, internal, missing_area_message};
use crate::postgres_paging::page_window;

mod counts;
mod links;

/// PostgreSQL implementation of the record repository port.
#[derive(Clone)]
pub struct PostgresRecordRepository {
    pool: PgPool,
}

impl PostgresRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    id: uuid::Uuid,
    area: String,
    user_id: uuid::Uuid,
    attributes: Json<RecordAttributes>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecordRow {
    fn into_record(self, kind: EntityKind) -> ProtectedRecord {
        ProtectedRecord {
            id: self.id,
            kind,
            area: self.area,
            user_id: UserId::from_uuid(self.user_id),
            attributes: self.attributes.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const RECORD_COLUMNS: &str = "id, area, user_id, attributes, created_at, updated_at";

fn unique_conflict(kind: EntityKind) -> String {
    format!(
        "a {} with the same unique value already exists",
        kind.display_name()
    )
}

#[async_trait]
impl RecordRepository for PostgresRecordRepository {
    async fn insert_record(&self, record: &ProtectedRecord) -> AppResult<()> {
        let statement = format!(
            "INSERT INTO {} ({RECORD_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)",
            record.kind.as_str()
        );

        sqlx::query(statement.as_str())
            .bind(record.id)
            .bind(record.area.as_str())
            .bind(record.user_id.as_uuid())
            .bind(Json(&record.attributes))
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|error| match Violation::of(&error) {
                Some(Violation::Unique) => AppError::Conflict(unique_conflict(record.kind)),
                Some(Violation::ForeignKey) => {
                    AppError::Validation(missing_area_message(record.area.as_str()))
                }
                None => AppError::Internal(format!("failed to insert record: {error}")),
            })?;

        Ok(())
    }

    async fn find_record(&self, entity: EntityRef) -> AppResult<Option<ProtectedRecord>> {
        let statement = format!(
            "SELECT {RECORD_COLUMNS} FROM {} WHERE id = $1",
            entity.kind.as_str()
        );

        let row = sqlx::query_as::<_, RecordRow>(statement.as_str())
            .bind(entity.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("load record"))?;

        Ok(row.map(|row| row.into_record(entity.kind)))
    }

    async fn list_records(&self, query: RecordQuery) -> AppResult<Vec<ProtectedRecord>> {
        let statement = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM {}
            WHERE ($1::TEXT IS NULL OR area = $1)
              AND ($2::JSONB IS NULL OR attributes @> $2)
            ORDER BY created_at DESC, id
            LIMIT $3
            OFFSET $4
            "#,
            query.kind.as_str()
        );
        let containment = query.filter.map(|filter| {
            let mut object = Map::new();
            object.insert(filter.field, filter.value);
            Json(Value::Object(object))
        });

        let window = page_window(query.limit, query.offset);

        let rows = sqlx::query_as::<_, RecordRow>(statement.as_str())
            .bind(query.area)
            .bind(containment)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(internal("list records"))?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_record(query.kind))
            .collect())
    }

    async fn update_record_attributes(
        &self,
        entity: EntityRef,
        attributes: &RecordAttributes,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ProtectedRecord> {
        let statement = format!(
            r#"
            UPDATE {}
            SET attributes = $2, updated_at = $3
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#,
            entity.kind.as_str()
        );

        let row = sqlx::query_as::<_, RecordRow>(statement.as_str())
            .bind(entity.id)
            .bind(Json(attributes))
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| match Violation::of(&error) {
                Some(_) => AppError::Conflict(unique_conflict(entity.kind)),
                None => AppError::Internal(format!("failed to update record: {error}")),
            })?
            .ok_or_else(|| AppError::NotFound(format!("{entity} not found")))?;

        Ok(row.into_record(entity.kind))
    }

    async fn delete_record(&self, entity: EntityRef) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(internal("begin transaction"))?;

        sqlx::query(
            r#"
            DELETE FROM record_links
            WHERE (left_kind = $1 AND left_id = $2)
               OR (right_kind = $1 AND right_id = $2)
            "#,
        )
        .bind(entity.kind.as_str())
        .bind(entity.id)
        .execute(&mut *transaction)
        .await
        .map_err(internal("delete record links"))?;

        let statement = format!("DELETE FROM {} WHERE id = $1", entity.kind.as_str());
        let rows_affected = sqlx::query(statement.as_str())
            .bind(entity.id)
            .execute(&mut *transaction)
            .await
            .map_err(internal("delete record"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("{entity} not found")));
        }

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))
    }

    async fn count_records(&self, query: RecordCountQuery) -> AppResult<Vec<RecordCount>> {
        self.count_records_impl(query).await
    }

    async fn insert_link(&self, link: RecordLink) -> AppResult<()> {
        self.insert_link_impl(link).await
    }

    async fn delete_link(&self, link: RecordLink) -> AppResult<()> {
        self.delete_link_impl(link).await
    }

    async fn list_links(&self, entity: EntityRef) -> AppResult<Vec<RecordLink>> {
        self.list_links_impl(entity).await
    }
}

fn decode_kind(value: &str) -> AppResult<EntityKind> {
    EntityKind::from_str(value).map_err(|error| {
        AppError::Internal(format!("failed to decode stored entity kind '{value}': {error}"))
    })
}
