use chrono::Utc;
use sgi_application::{UserRecord, UserRepository};
use sgi_core::{AppError, UserId};
use sgi_domain::Role;
use uuid::Uuid;

use super::PostgresUserRepository;
use crate::postgres_test_support::migrated_pool;

fn user(email: &str, area: &str) -> UserRecord {
    let now = Utc::now();
    UserRecord {
        id: UserId::new(),
        nombre: "Carla".to_owned(),
        apellido: "Rojas".to_owned(),
        cedula: None,
        telefono: Some("0414-0000000".to_owned()),
        email: email.to_owned(),
        role: Role::Analyst,
        area: area.to_owned(),
        password_hash: "$argon2id$placeholder".to_owned(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn email_lookup_ignores_case_and_duplicates_conflict() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let repository = PostgresUserRepository::new(pool);
    let email = format!("{}@sgi.test", Uuid::new_v4().simple());

    let stored = user(email.as_str(), "SEP");
    assert!(repository.insert_user(&stored).await.is_ok());

    let found = repository
        .find_by_email(email.to_uppercase().as_str())
        .await;
    assert!(matches!(
        found,
        Ok(Some(ref found)) if found.id == stored.id && found.role == Role::Analyst
    ));

    let duplicate = repository
        .insert_user(&user(email.to_uppercase().as_str(), "TIC"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    assert!(repository.delete_user(stored.id).await.is_ok());
    assert!(matches!(
        repository.delete_user(stored.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_area_is_rejected() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let repository = PostgresUserRepository::new(pool);
    let email = format!("{}@sgi.test", Uuid::new_v4().simple());

    let result = repository
        .insert_user(&user(email.as_str(), "Area Inexistente"))
        .await;

    let expected = "area 'Area Inexistente' does not exist";
    assert!(matches!(result, Err(AppError::Validation(ref message)) if message == expected));
}

#[tokio::test]
async fn offset_past_the_bigint_range_lists_no_users() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let repository = PostgresUserRepository::new(pool);

    let page = repository.list_users(10, usize::MAX).await;

    assert!(matches!(page, Ok(ref users) if users.is_empty()));
}
