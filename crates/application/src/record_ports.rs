use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sgi_core::{AppResult, UserId};
use sgi_domain::{
    EntityKind, EntityRef, ProtectedRecord, RecordAttributes, RecordLink, ReportPeriod,
};

/// Equality filter on one declared record field.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFieldFilter {
    /// Declared field name.
    pub field: String,
    /// Typed value to match.
    pub value: Value,
}

/// Collection listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    /// Kind to list.
    pub kind: EntityKind,
    /// Restricts results to one area; `None` lists every area.
    pub area: Option<String>,
    /// Optional attribute filter.
    pub filter: Option<RecordFieldFilter>,
    /// Maximum number of records.
    pub limit: usize,
    /// Number of records to skip.
    pub offset: usize,
}

/// Record counting query for management reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCountQuery {
    /// Kinds to count. An empty list counts nothing.
    pub kinds: Vec<EntityKind>,
    /// Creation period.
    pub period: ReportPeriod,
    /// Only records owned by this area.
    pub area: Option<String>,
    /// Only records created by this user.
    pub user_id: Option<UserId>,
    /// Also group by the `modalidad` attribute.
    pub by_modalidad: bool,
}

/// One group of a [`RecordCountQuery`]. Groups with no records are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCount {
    /// Counted kind.
    pub kind: EntityKind,
    /// Owning area.
    pub area: String,
    /// Modality value, set only when grouping by it.
    pub modalidad: Option<String>,
    /// Number of records.
    pub count: u64,
}

/// Repository port for protected records and their cross-references.
///
/// Implementations enforce per-kind uniqueness of fields flagged unique and
/// report violations as `Conflict`.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Persists a new record.
    async fn insert_record(&self, record: &ProtectedRecord) -> AppResult<()>;

    /// Loads one record.
    async fn find_record(&self, entity: EntityRef) -> AppResult<Option<ProtectedRecord>>;

    /// Lists records newest first.
    async fn list_records(&self, query: RecordQuery) -> AppResult<Vec<ProtectedRecord>>;

    /// Replaces the attributes of an existing record.
    async fn update_record_attributes(
        &self,
        entity: EntityRef,
        attributes: &RecordAttributes,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ProtectedRecord>;

    /// Deletes a record together with every link that touches it.
    async fn delete_record(&self, entity: EntityRef) -> AppResult<()>;

    /// Counts records created inside a period.
    async fn count_records(&self, query: RecordCountQuery) -> AppResult<Vec<RecordCount>>;

    /// Persists a new link.
    async fn insert_link(&self, link: RecordLink) -> AppResult<()>;

    /// Removes an existing link.
    async fn delete_link(&self, link: RecordLink) -> AppResult<()>;

    /// Lists links touching one record.
    async fn list_links(&self, entity: EntityRef) -> AppResult<Vec<RecordLink>>;
}
