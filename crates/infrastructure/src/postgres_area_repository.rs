//! PostgreSQL-backed area catalog.
//!
//! Area names are primary keys referenced by users and every record table with
//! `ON UPDATE CASCADE`, so a rename propagates inside the same statement and a
//! removal is refused by the foreign keys while the area is in use.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use sgi_application::AreaRepository;
use sgi_core::{AppError, AppResult};
use sgi_domain::AreaName;
use tracing::debug;

use crate::postgres_errors::{conflict_or_internal, internal};

/// PostgreSQL implementation of the area catalog port.
#[derive(Clone)]
pub struct PostgresAreaRepository {
    pool: PgPool,
}

impl PostgresAreaRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_area(name: String) -> AppResult<AreaName> {
    AreaName::new(name.as_str()).map_err(|error| {
        AppError::Internal(format!("failed to decode stored area '{name}': {error}"))
    })
}

async fn lock_area(
    transaction: &mut Transaction<'_, Postgres>,
    name: &str,
) -> AppResult<Option<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM areas
        WHERE lower(name) = lower($1)
        FOR UPDATE
        "#,
    )
    .bind(name.trim())
    .fetch_optional(&mut **transaction)
    .await
    .map_err(internal("lock area"))
}

#[async_trait]
impl AreaRepository for PostgresAreaRepository {
    async fn list_areas(&self) -> AppResult<Vec<AreaName>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM areas
            ORDER BY lower(name)
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list areas"))?;

        names.into_iter().map(decode_area).collect()
    }

    async fn find_area(&self, name: &str) -> AppResult<Option<AreaName>> {
        let stored = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM areas
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("find area"))?;

        stored.map(decode_area).transpose()
    }

    async fn create_area(&self, area: &AreaName) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO areas (name)
            VALUES ($1)
            "#,
        )
        .bind(area.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                format!("area '{area}' already exists").as_str(),
                "create area",
            )
        })?;

        Ok(())
    }

    async fn rename_area(&self, current: &str, renamed: &AreaName) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(internal("begin transaction"))?;

        let Some(stored) = lock_area(&mut transaction, current).await? else {
            return Err(AppError::NotFound(format!(
                "area '{}' does not exist",
                current.trim()
            )));
        };

        sqlx::query(
            r#"
            UPDATE areas
            SET name = $2
            WHERE name = $1
            "#,
        )
        .bind(stored.as_str())
        .bind(renamed.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                format!("area '{renamed}' already exists").as_str(),
                "rename area",
            )
        })?;

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))?;
        debug!(from = %stored, to = %renamed, "area renamed with cascade");
        Ok(())
    }

    async fn remove_area(&self, name: &str) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(internal("begin transaction"))?;

        let Some(stored) = lock_area(&mut transaction, name).await? else {
            return Err(AppError::NotFound(format!(
                "area '{}' does not exist",
                name.trim()
            )));
        };

        sqlx::query(
            r#"
            DELETE FROM areas
            WHERE name = $1
            "#,
        )
        .bind(stored.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                format!("area '{stored}' is still assigned to users or records").as_str(),
                "remove area",
            )
        })?;

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))
    }
}

#[cfg(test)]
mod tests;
