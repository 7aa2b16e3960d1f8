//! Shared setup for tests that need a live PostgreSQL.
//!
//! Every test calls [`migrated_pool`] first and returns early on `None`, so the
//! suite passes on machines without `DATABASE_URL`. Tests share one database and
//! must not rely on it being empty: names they create carry a random suffix.

use sgi_domain::AreaName;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

pub(crate) async fn migrated_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
        .unwrap_or_else(|error| panic!("DATABASE_URL is set but unreachable: {error}"));

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .unwrap_or_else(|error| panic!("migrations failed against test database: {error}"));

    Some(pool)
}

/// An area name no other test run will produce.
pub(crate) fn unique_area(prefix: &str) -> AreaName {
    AreaName::new(format!("{prefix} {}", Uuid::new_v4().simple()))
        .unwrap_or_else(|error| panic!("generated area name is valid: {error}"))
}
