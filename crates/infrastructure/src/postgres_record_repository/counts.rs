use sgi_domain::MODALIDAD_FIELD;

use super::*;

#[derive(Debug, FromRow)]
struct CountRow {
    kind: String,
    area: String,
    modalidad: Option<String>,
    total: i64,
}

impl PostgresRecordRepository {
    pub(super) async fn count_records_impl(
        &self,
        query: RecordCountQuery,
    ) -> AppResult<Vec<RecordCount>> {
        if query.kinds.is_empty() {
            return Ok(Vec::new());
        }

        let modalidad = if query.by_modalidad {
            format!("attributes->>'{MODALIDAD_FIELD}'")
        } else {
            "NULL::TEXT".to_owned()
        };
        let statement = query
            .kinds
            .iter()
            .map(|kind| {
                format!(
                    r#"
                    SELECT '{kind}' AS kind, area, {modalidad} AS modalidad, COUNT(*) AS total
                    FROM {kind}
                    WHERE created_at >= $1 AND created_at < $2
                      AND ($3::TEXT IS NULL OR area = $3)
                      AND ($4::UUID IS NULL OR user_id = $4)
                    GROUP BY 2, 3
                    "#,
                    kind = kind.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ");

        let rows = sqlx::query_as::<_, CountRow>(statement.as_str())
            .bind(query.period.starts_at())
            .bind(query.period.ends_before())
            .bind(query.area)
            .bind(query.user_id.map(|user_id| user_id.as_uuid()))
            .fetch_all(&self.pool)
            .await
            .map_err(internal("count records"))?;

        rows.into_iter()
            .map(|row| {
                Ok(RecordCount {
                    kind: decode_kind(row.kind.as_str())?,
                    area: row.area,
                    modalidad: row.modalidad,
                    count: u64::try_from(row.total).map_err(|_| {
                        AppError::Internal(format!("negative record count {}", row.total))
                    })?,
                })
            })
            .collect()
    }
}
