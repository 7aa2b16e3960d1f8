use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_core::AppResult;
use sgi_domain::AuditAction;
use uuid::Uuid;

/// One change to protected data or security configuration.
///
/// `subject` is the acting user id rendered as text, `resource_type` the
/// route segment or configuration object touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Acting user.
    pub subject: String,
    /// What happened.
    pub action: AuditAction,
    /// Kind of object touched.
    pub resource_type: String,
    /// Identifier of the object touched.
    pub resource_id: String,
    /// Free-form context, such as the old and new name of a renamed area.
    pub detail: Option<String>,
}

/// An [`AuditEvent`] after it has been written to the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Trail-assigned identifier.
    pub id: Uuid,
    /// Recorded event.
    pub event: AuditEvent,
    /// Time the trail accepted the event.
    pub created_at: DateTime<Utc>,
}

/// Filters for reading the trail back. Both filters are exact matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Page size, already capped by the caller.
    pub limit: usize,
    /// Entries to skip.
    pub offset: usize,
    /// Only entries with this action.
    pub action: Option<AuditAction>,
    /// Only entries by this subject.
    pub subject: Option<String>,
}

impl AuditLogQuery {
    /// Returns whether a stored event passes both filters.
    #[must_use]
    pub fn matches(&self, event: &AuditEvent) -> bool {
        self.action.is_none_or(|action| event.action == action)
            && self
                .subject
                .as_deref()
                .is_none_or(|subject| event.subject == subject)
    }
}

/// Write side of the audit trail. Entries are never updated or deleted.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}

/// Read side of the audit trail.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists entries newest first.
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
