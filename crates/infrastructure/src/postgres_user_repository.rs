//! PostgreSQL-backed user repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sgi_application::{UserRecord, UserRepository};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::Role;

use crate::postgres_errors::{Violation, internal, missing_area_message};
use crate::postgres_paging::page_window;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    nombre: String,
    apellido: String,
    cedula: Option<String>,
    telefono: Option<String>,
    email: String,
    role: String,
    area: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(row.role.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode role '{}' of user '{}': {error}",
                row.role, row.id
            ))
        })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            nombre: row.nombre,
            apellido: row.apellido,
            cedula: row.cedula,
            telefono: row.telefono,
            email: row.email,
            role,
            area: row.area,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, nombre, apellido, cedula, telefono, email, role, area, \
                            password_hash, created_at, updated_at";

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn list_users(&self, limit: usize, offset: usize) -> AppResult<Vec<UserRecord>> {
        self.list_users_impl(limit, offset).await
    }

    async fn count_users(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(internal("count users"))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn insert_user(&self, user: &UserRecord) -> AppResult<()> {
        self.insert_user_impl(user).await
    }

    async fn update_user(&self, user: &UserRecord) -> AppResult<()> {
        self.update_user_impl(user).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(user_id, password_hash).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.delete_user_impl(user_id).await
    }
}

fn account_write_error(error: sqlx::Error, user: &UserRecord, operation: &str) -> AppError {
    match Violation::of(&error) {
        Some(Violation::Unique) => {
            AppError::Conflict("an account with this email already exists".to_owned())
        }
        Some(Violation::ForeignKey) => AppError::Validation(missing_area_message(&user.area)),
        None => AppError::Internal(format!("failed to {operation}: {error}")),
    }
}

#[cfg(test)]
mod tests;
