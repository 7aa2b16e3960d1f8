use super::*;

impl PostgresUserRepository {
    pub(super) async fn find_by_email_impl(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let statement = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(statement.as_str())
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("find user by email"))?;

        row.map(UserRecord::try_from).transpose()
    }

    pub(super) async fn find_by_id_impl(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let statement = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(statement.as_str())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("find user by id"))?;

        row.map(UserRecord::try_from).transpose()
    }

    pub(super) async fn list_users_impl(
        &self,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<UserRecord>> {
        let statement =
            format!("SELECT {USER_COLUMNS} FROM users ORDER BY lower(email) LIMIT $1 OFFSET $2");
        let window = page_window(limit, offset);
        let rows = sqlx::query_as::<_, UserRow>(statement.as_str())
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(internal("list users"))?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }
}
