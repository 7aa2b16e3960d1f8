use chrono::Duration;
use sgi_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
use sgi_domain::AuditAction;
use uuid::Uuid;

use super::PostgresAuditTrail;
use crate::postgres_test_support::migrated_pool;

fn event(subject: &str, action: AuditAction, resource_id: &str) -> AuditEvent {
    AuditEvent {
        subject: subject.to_owned(),
        action,
        resource_type: "personas".to_owned(),
        resource_id: resource_id.to_owned(),
        detail: None,
    }
}

fn query(subject: &str, action: Option<AuditAction>) -> AuditLogQuery {
    AuditLogQuery {
        limit: 50,
        offset: 0,
        action,
        subject: Some(subject.to_owned()),
    }
}

#[tokio::test]
async fn recorded_events_read_back_newest_first_with_filters() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let trail = PostgresAuditTrail::new(pool.clone());
    let subject = Uuid::new_v4().to_string();

    assert!(
        trail
            .record(event(&subject, AuditAction::RecordCreated, "persona-1"))
            .await
            .is_ok()
    );
    let backdated = sqlx::query(
        "UPDATE audit_log_entries SET created_at = created_at - $2::INTERVAL WHERE subject = $1",
    )
    .bind(subject.as_str())
    .bind(format!("{} seconds", Duration::days(1).num_seconds()))
    .execute(&pool)
    .await;
    assert!(backdated.is_ok());
    assert!(
        trail
            .record(event(&subject, AuditAction::RecordUpdated, "persona-1"))
            .await
            .is_ok()
    );

    let Ok(all) = trail.list_entries(query(&subject, None)).await else {
        panic!("trail should be readable");
    };
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].event.action, AuditAction::RecordUpdated);
    assert!(all[0].created_at > all[1].created_at);

    let Ok(updates) = trail
        .list_entries(query(&subject, Some(AuditAction::RecordUpdated)))
        .await
    else {
        panic!("filtered trail should be readable");
    };
    assert!(matches!(updates.as_slice(), [entry] if entry.event.resource_id == "persona-1"));
}

#[tokio::test]
async fn unknown_stored_action_surfaces_as_internal_error() {
    let Some(pool) = migrated_pool().await else {
        return;
    };
    let trail = PostgresAuditTrail::new(pool.clone());
    let subject = Uuid::new_v4().to_string();

    let inserted = sqlx::query(
        "INSERT INTO audit_log_entries (subject, action, resource_type, resource_id) \
         VALUES ($1, 'legacy.action', 'personas', 'x')",
    )
    .bind(subject.as_str())
    .execute(&pool)
    .await;
    assert!(inserted.is_ok());

    let listed = trail.list_entries(query(&subject, None)).await;
    assert!(matches!(listed, Err(sgi_core::AppError::Internal(_))));
}
