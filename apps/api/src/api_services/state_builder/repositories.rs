use std::sync::Arc;

use sgi_application::{
    AreaRepository, AuditLogRepository, AuditRepository, AuthorizationRepository,
    RecordRepository, TemporaryGrantRepository, UserRepository,
};
use sgi_infrastructure::{
    PostgresAreaRepository, PostgresAuditTrail, PostgresAuthorizationRepository,
    PostgresRecordRepository, PostgresTemporaryGrantRepository, PostgresUserRepository,
};
#[cfg(test)]
use sgi_infrastructure::InMemoryStore;
use sqlx::PgPool;

pub(super) struct RepositorySet {
    pub(super) authorization_repository: Arc<dyn AuthorizationRepository>,
    pub(super) record_repository: Arc<dyn RecordRepository>,
    pub(super) grant_repository: Arc<dyn TemporaryGrantRepository>,
    pub(super) area_repository: Arc<dyn AreaRepository>,
    pub(super) user_repository: Arc<dyn UserRepository>,
    pub(super) audit_repository: Arc<dyn AuditRepository>,
    pub(super) audit_log_repository: Arc<dyn AuditLogRepository>,
}

pub(super) fn build_repository_set(pool: &PgPool) -> RepositorySet {
    let audit_trail = Arc::new(PostgresAuditTrail::new(pool.clone()));
    RepositorySet {
        authorization_repository: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        record_repository: Arc::new(PostgresRecordRepository::new(pool.clone())),
        grant_repository: Arc::new(PostgresTemporaryGrantRepository::new(pool.clone())),
        area_repository: Arc::new(PostgresAreaRepository::new(pool.clone())),
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        audit_repository: audit_trail.clone(),
        audit_log_repository: audit_trail,
    }
}

#[cfg(test)]
pub(super) fn in_memory_repository_set(store: &Arc<InMemoryStore>) -> RepositorySet {
    RepositorySet {
        authorization_repository: store.clone(),
        record_repository: store.clone(),
        grant_repository: store.clone(),
        area_repository: store.clone(),
        user_repository: store.clone(),
        audit_repository: store.clone(),
        audit_log_repository: store.clone(),
    }
}
