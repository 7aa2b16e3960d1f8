use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sgi_application::{AuditLogEntry, ListAuditLogInput};
use sgi_core::AppError;
use sgi_domain::{AreaName, AuditAction, TemporaryGrant};
use ts_rs::TS;

/// Incoming payload naming one area.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/area-request.ts"
)]
pub struct AreaRequest {
    pub area: String,
}

/// Incoming payload for area renames.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rename-area-request.ts"
)]
pub struct RenameAreaRequest {
    pub old_area: String,
    pub new_area: String,
}

/// API representation of an area catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/area-response.ts"
)]
pub struct AreaResponse {
    pub area: String,
}

impl From<AreaName> for AreaResponse {
    fn from(value: AreaName) -> Self {
        Self {
            area: value.into(),
        }
    }
}

/// Incoming payload for temporary access grants.
///
/// `entity_type` accepts a route segment (`personas`) or singular kind name.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-temporary-access-request.ts"
)]
pub struct CreateTemporaryAccessRequest {
    pub user_id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub expires_at: String,
}

/// API representation of a temporary access grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/temporary-access-grant-response.ts"
)]
pub struct TemporaryAccessGrantResponse {
    pub id: String,
    pub user_id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub expires_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TemporaryGrant> for TemporaryAccessGrantResponse {
    fn from(value: TemporaryGrant) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            entity_id: value.entity.id.to_string(),
            entity_type: value.entity.kind.route_segment().to_owned(),
            expires_at: value.expires_at.to_rfc3339(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for temporary access listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListTemporaryAccessQuery {
    pub user_id: Option<String>,
    pub active_only: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Result of purging expired grants.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/purge-result-response.ts"
)]
pub struct PurgeResultResponse {
    #[ts(type = "number")]
    pub deleted: u64,
}

/// Query parameters for audit log listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListAuditLogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

impl TryFrom<ListAuditLogQuery> for ListAuditLogInput {
    type Error = AppError;

    fn try_from(value: ListAuditLogQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: value.limit,
            offset: value.offset,
            action: value.action.as_deref().map(AuditAction::from_str).transpose()?,
            subject: value.subject,
        })
    }
}

/// API representation of one audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            id: value.id.to_string(),
            subject: value.event.subject,
            action: value.event.action.as_str().to_owned(),
            resource_type: value.event.resource_type,
            resource_id: value.event.resource_id,
            detail: value.event.detail,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
