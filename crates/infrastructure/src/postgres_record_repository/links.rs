use sqlx::FromRow;

use crate::postgres_errors::conflict_or_internal;

use super::*;

#[derive(Debug, FromRow)]
struct LinkRow {
    left_kind: String,
    left_id: uuid::Uuid,
    right_kind: String,
    right_id: uuid::Uuid,
}

impl PostgresRecordRepository {
    pub(super) async fn insert_link_impl(&self, link: RecordLink) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO record_links (left_kind, left_id, right_kind, right_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(link.left().kind.as_str())
        .bind(link.left().id)
        .bind(link.right().kind.as_str())
        .bind(link.right().id)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(error, "records are already linked", "insert record link")
        })?;

        Ok(())
    }

    pub(super) async fn delete_link_impl(&self, link: RecordLink) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM record_links
            WHERE left_kind = $1 AND left_id = $2
              AND right_kind = $3 AND right_id = $4
            "#,
        )
        .bind(link.left().kind.as_str())
        .bind(link.left().id)
        .bind(link.right().kind.as_str())
        .bind(link.right().id)
        .execute(&self.pool)
        .await
        .map_err(internal("delete record link"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "no link between {} and {}",
                link.left(),
                link.right()
            )));
        }

        Ok(())
    }

    pub(super) async fn list_links_impl(&self, entity: EntityRef) -> AppResult<Vec<RecordLink>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT left_kind, left_id, right_kind, right_id
            FROM record_links
            WHERE (left_kind = $1 AND left_id = $2)
               OR (right_kind = $1 AND right_id = $2)
            ORDER BY created_at
            "#,
        )
        .bind(entity.kind.as_str())
        .bind(entity.id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list record links"))?;

        rows.into_iter()
            .map(|row| {
                RecordLink::new(
                    EntityRef::new(decode_kind(row.left_kind.as_str())?, row.left_id),
                    EntityRef::new(decode_kind(row.right_kind.as_str())?, row.right_id),
                )
            })
            .collect()
    }
}
