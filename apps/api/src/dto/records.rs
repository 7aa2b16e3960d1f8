use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sgi_application::{ListRecordsInput, RecordDetails};
use sgi_domain::{EntityRef, ProtectedRecord};
use ts_rs::TS;

/// Query parameters for collection listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub field: Option<String>,
    pub value: Option<String>,
}

impl From<ListRecordsQuery> for ListRecordsInput {
    fn from(value: ListRecordsQuery) -> Self {
        Self {
            limit: value.limit,
            offset: value.offset,
            field: value.field,
            value: value.value,
        }
    }
}

/// API representation of a protected record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/record-response.ts"
)]
pub struct RecordResponse {
    pub id: String,
    pub entity_type: String,
    pub area: String,
    pub user_id: String,
    #[ts(type = "Record<string, unknown>")]
    pub attributes: Map<String, Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProtectedRecord> for RecordResponse {
    fn from(value: ProtectedRecord) -> Self {
        Self {
            id: value.id.to_string(),
            entity_type: value.kind.route_segment().to_owned(),
            area: value.area,
            user_id: value.user_id.to_string(),
            attributes: value.attributes,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One end of a cross-reference.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/record-link-response.ts"
)]
pub struct RecordLinkResponse {
    pub entity_type: String,
    pub entity_id: String,
}

impl From<EntityRef> for RecordLinkResponse {
    fn from(value: EntityRef) -> Self {
        Self {
            entity_type: value.kind.route_segment().to_owned(),
            entity_id: value.id.to_string(),
        }
    }
}

/// A record together with the records it is linked to.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/record-details-response.ts"
)]
pub struct RecordDetailsResponse {
    pub record: RecordResponse,
    pub links: Vec<RecordLinkResponse>,
}

impl From<RecordDetails> for RecordDetailsResponse {
    fn from(value: RecordDetails) -> Self {
        Self {
            record: RecordResponse::from(value.record),
            links: value
                .links
                .into_iter()
                .map(RecordLinkResponse::from)
                .collect(),
        }
    }
}

/// Incoming payload for linking two records.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-record-link-request.ts"
)]
pub struct CreateRecordLinkRequest {
    pub entity_type: String,
    pub entity_id: String,
}
