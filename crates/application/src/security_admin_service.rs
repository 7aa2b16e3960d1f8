//! Administrative workflows around access control.
//!
//! Temporary grant administration, the area catalog and the audit log all
//! sit behind the admin role gate. Listing areas is the one read open to
//! every authenticated principal.

use std::sync::Arc;

use sgi_core::{AppResult, Principal};

use crate::{
    AccessControlService, AreaRepository, AuditEvent, AuditLogRepository, AuditRepository,
    RoleGate, TemporaryGrantRepository, UserRepository,
};

mod areas;
mod audit;
mod temporary_access;

pub use audit::ListAuditLogInput;
pub use temporary_access::ListTemporaryGrantsInput;

/// Default page size for administrative listings.
pub const DEFAULT_ADMIN_PAGE_SIZE: usize = 50;

/// Maximum page size for administrative listings.
pub const MAX_ADMIN_PAGE_SIZE: usize = 200;

/// Repositories required by [`SecurityAdminService`].
#[derive(Clone)]
pub struct SecurityAdminRepositories {
    /// Temporary grant storage.
    pub grants: Arc<dyn TemporaryGrantRepository>,
    /// Area catalog storage.
    pub areas: Arc<dyn AreaRepository>,
    /// User lookups for grantee validation.
    pub users: Arc<dyn UserRepository>,
    /// Audit log reads.
    pub audit_log: Arc<dyn AuditLogRepository>,
    /// Audit log writes.
    pub audit: Arc<dyn AuditRepository>,
}

/// Application service for security administration workflows.
#[derive(Clone)]
pub struct SecurityAdminService {
    access_control: AccessControlService,
    grant_repository: Arc<dyn TemporaryGrantRepository>,
    area_repository: Arc<dyn AreaRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        access_control: AccessControlService,
        repositories: SecurityAdminRepositories,
    ) -> Self {
        Self {
            access_control,
            grant_repository: repositories.grants,
            area_repository: repositories.areas,
            user_repository: repositories.users,
            audit_log_repository: repositories.audit_log,
            audit_repository: repositories.audit,
        }
    }

    fn require_admin(&self, actor: &Principal) -> AppResult<()> {
        RoleGate::ADMIN_ONLY.check(actor, None)
    }

    async fn append_audit(&self, actor: &Principal, event: AdminAuditEvent) -> AppResult<()> {
        self.audit_repository
            .record(AuditEvent {
                subject: actor.user_id().to_string(),
                action: event.action,
                resource_type: event.resource_type.to_owned(),
                resource_id: event.resource_id,
                detail: event.detail,
            })
            .await
    }
}

struct AdminAuditEvent {
    action: sgi_domain::AuditAction,
    resource_type: &'static str,
    resource_id: String,
    detail: Option<String>,
}

fn page_size(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_ADMIN_PAGE_SIZE)
        .clamp(1, MAX_ADMIN_PAGE_SIZE)
}
