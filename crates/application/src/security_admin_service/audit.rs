use sgi_core::{AppResult, Principal};
use sgi_domain::AuditAction;

use crate::{AuditLogEntry, AuditLogQuery};

use super::{SecurityAdminService, page_size};

/// Audit log listing input as received from transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAuditLogInput {
    /// Requested page size.
    pub limit: Option<usize>,
    /// Requested offset.
    pub offset: Option<usize>,
    /// Optional action filter.
    pub action: Option<AuditAction>,
    /// Optional subject filter.
    pub subject: Option<String>,
}

impl SecurityAdminService {
    /// Lists audit entries, newest first.
    pub async fn list_audit_log(
        &self,
        actor: &Principal,
        input: ListAuditLogInput,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require_admin(actor)?;

        self.audit_log_repository
            .list_entries(AuditLogQuery {
                limit: page_size(input.limit),
                offset: input.offset.unwrap_or(0),
                action: input.action,
                subject: input
                    .subject
                    .map(|subject| subject.trim().to_owned())
                    .filter(|subject| !subject.is_empty()),
            })
            .await
    }
}
