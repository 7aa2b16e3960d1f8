use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use sgi_core::{AppError, AppResult, Principal};
use sgi_domain::{
    AuditAction, EntityKind, EntityRef, FieldKind, FieldSpec, ProtectedRecord, RecordLink,
    canonical_timestamp,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    AccessControlService, AccessTarget, AuditEvent, AuditRepository, AuthorizationContext,
    AuthorizedEntity, RecordFieldFilter, RecordQuery, RecordRepository, RoleGate,
};

mod rating;
mod reports;

pub use reports::{
    AreaModalidadCounts, AreaRecordCounts, KindCounts, ModalidadCount, REPORT_SCOPE_MESSAGE,
};

/// Default page size for record listings.
pub const DEFAULT_RECORD_PAGE_SIZE: usize = 50;

/// Maximum page size for record listings.
pub const MAX_RECORD_PAGE_SIZE: usize = 200;

/// Record operations and their role whitelists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOperation {
    /// Create a record in a collection.
    Create,
    /// Read one record.
    Read,
    /// List a collection.
    List,
    /// Update one record.
    Update,
    /// Delete one record.
    Delete,
    /// Add or remove a cross-reference.
    Link,
    /// Read management statistics.
    Report,
    /// Rate a case.
    Rate,
}

impl RecordOperation {
    /// Returns the role gate guarding this operation.
    #[must_use]
    pub const fn gate(self) -> RoleGate {
        match self {
            Self::Create => RoleGate::new(&["admin", "superuser", "user"]),
            Self::Read | Self::List | Self::Report | Self::Rate => {
                RoleGate::new(&["admin", "superuser", "analyst"])
            }
            Self::Update | Self::Link => RoleGate::SUPERVISORS,
            Self::Delete => RoleGate::ADMIN_ONLY,
        }
    }
}

/// Record listing input as received from transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRecordsInput {
    /// Requested page size.
    pub limit: Option<usize>,
    /// Requested offset.
    pub offset: Option<usize>,
    /// Field to filter on.
    pub field: Option<String>,
    /// Raw value the field must equal.
    pub value: Option<String>,
}

/// Record together with the records it is linked to.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetails {
    /// The record.
    pub record: ProtectedRecord,
    /// Linked records.
    pub links: Vec<EntityRef>,
}

/// Application service for protected record CRUD and cross-references.
#[derive(Clone)]
pub struct RecordService {
    access_control: AccessControlService,
    repository: Arc<dyn RecordRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RecordService {
    /// Creates a new record service.
    #[must_use]
    pub fn new(
        access_control: AccessControlService,
        repository: Arc<dyn RecordRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            access_control,
            repository,
            audit_repository,
        }
    }

    /// Creates a record owned by the actor's home area.
    ///
    /// Any client-supplied `area` is discarded.
    pub async fn create_record(
        &self,
        actor: &Principal,
        kind: EntityKind,
        payload: &Value,
    ) -> AppResult<ProtectedRecord> {
        self.authorize_collection(actor, kind, RecordOperation::Create)
            .await?;

        let attributes = kind.validate_new_attributes(payload)?;
        let now = Utc::now();
        let record = ProtectedRecord {
            id: Uuid::new_v4(),
            kind,
            area: actor.area().to_owned(),
            user_id: actor.user_id(),
            attributes,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert_record(&record).await?;
        info!(entity = %record.entity_ref(), area = %record.area, "record created");

        self.append_audit(
            actor,
            AuditAction::RecordCreated,
            record.entity_ref(),
            Some(format!("area '{}'", record.area)),
        )
        .await?;

        Ok(record)
    }

    /// Returns one record with its cross-references.
    pub async fn get_record(&self, actor: &Principal, entity: EntityRef) -> AppResult<RecordDetails> {
        self.authorize_entity(actor, entity, RecordOperation::Read)
            .await?;

        let record = self.load_record(entity).await?;
        let links = self
            .repository
            .list_links(entity)
            .await?
            .into_iter()
            .filter_map(|link| link.other_end(entity))
            .collect();

        Ok(RecordDetails { record, links })
    }

    /// Lists a collection. Non-admins only see records of their own area.
    pub async fn list_records(
        &self,
        actor: &Principal,
        kind: EntityKind,
        input: ListRecordsInput,
    ) -> AppResult<Vec<ProtectedRecord>> {
        self.authorize_collection(actor, kind, RecordOperation::List)
            .await?;

        let filter = match (input.field, input.value) {
            (Some(field), Some(value)) => Some(field_filter(kind, field.as_str(), value.as_str())?),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "field and value filters must be provided together".to_owned(),
                ));
            }
        };

        let area = if actor.is_admin() {
            None
        } else {
            Some(actor.area().to_owned())
        };

        self.repository
            .list_records(RecordQuery {
                kind,
                area,
                filter,
                limit: input
                    .limit
                    .unwrap_or(DEFAULT_RECORD_PAGE_SIZE)
                    .clamp(1, MAX_RECORD_PAGE_SIZE),
                offset: input.offset.unwrap_or(0),
            })
            .await
    }

    /// Merges a patch into a record. The record keeps its area.
    pub async fn update_record(
        &self,
        actor: &Principal,
        entity: EntityRef,
        patch: &Value,
    ) -> AppResult<ProtectedRecord> {
        self.authorize_entity(actor, entity, RecordOperation::Update)
            .await?;

        let current = self.load_record(entity).await?;
        let attributes = entity.kind.merge_attributes(&current.attributes, patch)?;
        let updated = self
            .repository
            .update_record_attributes(entity, &attributes, Utc::now())
            .await?;

        self.append_audit(actor, AuditAction::RecordUpdated, entity, None)
            .await?;

        Ok(updated)
    }

    /// Deletes a record and its cross-references.
    pub async fn delete_record(&self, actor: &Principal, entity: EntityRef) -> AppResult<()> {
        let resolved = self
            .authorize_entity(actor, entity, RecordOperation::Delete)
            .await?;

        self.repository.delete_record(entity).await?;
        info!(entity = %entity, area = %resolved.area, "record deleted");

        self.append_audit(
            actor,
            AuditAction::RecordDeleted,
            entity,
            Some(format!("area '{}'", resolved.area)),
        )
        .await
    }

    /// Links two records. The actor must reach both.
    pub async fn link_records(
        &self,
        actor: &Principal,
        source: EntityRef,
        target: EntityRef,
    ) -> AppResult<()> {
        let link = RecordLink::new(source, target)?;
        self.authorize_entity(actor, source, RecordOperation::Link)
            .await?;
        self.authorize_entity(actor, target, RecordOperation::Link)
            .await?;

        self.repository.insert_link(link).await?;
        self.append_audit(
            actor,
            AuditAction::RecordLinked,
            source,
            Some(format!("linked to {target}")),
        )
        .await
    }

    /// Removes a link between two records. The actor must reach both.
    pub async fn unlink_records(
        &self,
        actor: &Principal,
        source: EntityRef,
        target: EntityRef,
    ) -> AppResult<()> {
        let link = RecordLink::new(source, target)?;
        self.authorize_entity(actor, source, RecordOperation::Link)
            .await?;
        self.authorize_entity(actor, target, RecordOperation::Link)
            .await?;

        self.repository.delete_link(link).await?;
        self.append_audit(
            actor,
            AuditAction::RecordUnlinked,
            source,
            Some(format!("unlinked from {target}")),
        )
        .await
    }

    async fn authorize_entity(
        &self,
        actor: &Principal,
        entity: EntityRef,
        operation: RecordOperation,
    ) -> AppResult<AuthorizedEntity> {
        let context = self
            .access_control
            .authorize(actor, AccessTarget::Entity(entity))
            .await?;
        operation.gate().check(actor, Some(&context))?;

        let Some(resolved) = context.entity() else {
            return Err(AppError::Internal(format!(
                "access decision for {entity} resolved no record"
            )));
        };
        Ok(resolved.clone())
    }

    async fn authorize_collection(
        &self,
        actor: &Principal,
        kind: EntityKind,
        operation: RecordOperation,
    ) -> AppResult<AuthorizationContext> {
        let context = self
            .access_control
            .authorize(actor, AccessTarget::Collection(kind))
            .await?;
        operation.gate().check(actor, Some(&context))?;
        Ok(context)
    }

    async fn load_record(&self, entity: EntityRef) -> AppResult<ProtectedRecord> {
        self.repository
            .find_record(entity)
            .await?
            .ok_or_else(|| AppError::NotFound(crate::ENTITY_NOT_FOUND_MESSAGE.to_owned()))
    }

    async fn append_audit(
        &self,
        actor: &Principal,
        action: AuditAction,
        entity: EntityRef,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .record(AuditEvent {
                subject: actor.user_id().to_string(),
                action,
                resource_type: entity.kind.as_str().to_owned(),
                resource_id: entity.id.to_string(),
                detail,
            })
            .await
    }
}

fn field_filter(kind: EntityKind, field: &str, raw: &str) -> AppResult<RecordFieldFilter> {
    let spec = kind.field(field).ok_or_else(|| {
        AppError::Validation(format!("unknown field '{field}' for {}", kind.as_str()))
    })?;

    Ok(RecordFieldFilter {
        field: spec.name.to_owned(),
        value: typed_filter_value(spec, raw)?,
    })
}

fn typed_filter_value(spec: &FieldSpec, raw: &str) -> AppResult<Value> {
    let invalid = || {
        AppError::Validation(format!(
            "filter value for '{}' must be a {} value",
            spec.name,
            spec.kind.as_str()
        ))
    };

    let value = match spec.kind {
        FieldKind::Integer => Value::from(raw.parse::<i64>().map_err(|_| invalid())?),
        FieldKind::Boolean => Value::from(raw.parse::<bool>().map_err(|_| invalid())?),
        FieldKind::Timestamp => Value::from(canonical_timestamp(raw).ok_or_else(invalid)?),
        FieldKind::Text | FieldKind::Uuid => Value::from(raw),
    };

    if spec.kind.accepts(&value) {
        Ok(value)
    } else {
        Err(invalid())
    }
}
