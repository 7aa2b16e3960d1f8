use super::*;

impl PostgresUserRepository {
    pub(super) async fn insert_user_impl(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                nombre,
                apellido,
                cedula,
                telefono,
                email,
                role,
                area,
                password_hash,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, LOWER($6), $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.nombre.as_str())
        .bind(user.apellido.as_str())
        .bind(user.cedula.as_deref())
        .bind(user.telefono.as_deref())
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(user.area.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| account_write_error(error, user, "create user"))?;

        Ok(())
    }

    pub(super) async fn update_user_impl(&self, user: &UserRecord) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET nombre = $2,
                apellido = $3,
                cedula = $4,
                telefono = $5,
                email = LOWER($6),
                role = $7,
                area = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.nombre.as_str())
        .bind(user.apellido.as_str())
        .bind(user.cedula.as_deref())
        .bind(user.telefono.as_deref())
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(user.area.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| account_write_error(error, user, "update user"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{}' not found", user.id)));
        }

        Ok(())
    }

    pub(super) async fn update_password_impl(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        Ok(())
    }

    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(internal("delete user"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        Ok(())
    }
}
