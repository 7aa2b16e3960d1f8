use chrono::Utc;
use sgi_application::AreaRepository;
use sgi_core::AppError;
use sgi_domain::AreaName;
use uuid::Uuid;

use super::PostgresAreaRepository;
use crate::postgres_test_support::{migrated_pool, unique_area};

#[tokio::test]
async fn rename_cascades_to_records_and_removal_is_blocked_while_in_use() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let repository = PostgresAreaRepository::new(pool.clone());
    let original = unique_area("Legal");
    let renamed = unique_area("Juridico");

    assert!(repository.create_area(&original).await.is_ok());
    assert!(matches!(
        repository
            .create_area(&unique_area_like(&original))
            .await,
        Err(AppError::Conflict(_))
    ));

    let record_id = Uuid::new_v4();
    let insert = sqlx::query(
        r#"
        INSERT INTO caso (id, area, user_id, attributes, created_at, updated_at)
        VALUES ($1, $2, $3, '{}'::jsonb, $4, $4)
        "#,
    )
    .bind(record_id)
    .bind(original.as_str())
    .bind(Uuid::new_v4())
    .bind(Utc::now())
    .execute(&pool)
    .await;
    assert!(insert.is_ok());

    assert!(
        repository
            .rename_area(original.as_str(), &renamed)
            .await
            .is_ok()
    );
    let stored_area = sqlx::query_scalar::<_, String>("SELECT area FROM caso WHERE id = $1")
        .bind(record_id)
        .fetch_one(&pool)
        .await;
    assert!(matches!(stored_area, Ok(ref area) if area == renamed.as_str()));

    assert!(matches!(
        repository.remove_area(renamed.as_str()).await,
        Err(AppError::Conflict(_))
    ));

    let cleanup = sqlx::query("DELETE FROM caso WHERE id = $1")
        .bind(record_id)
        .execute(&pool)
        .await;
    assert!(cleanup.is_ok());
    assert!(repository.remove_area(renamed.as_str()).await.is_ok());
    assert!(matches!(
        repository.find_area(renamed.as_str()).await,
        Ok(None)
    ));
}

fn unique_area_like(area: &AreaName) -> AreaName {
    match AreaName::new(area.as_str().to_lowercase()) {
        Ok(area) => area,
        Err(error) => panic!("lowercased area name is valid: {error}"),
    }
}
