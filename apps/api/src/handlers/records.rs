//! Handlers shared by every protected record collection.
//!
//! The router mounts one copy of these routes per entity kind and attaches
//! the kind as a request extension, so handlers never parse it from the URL.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use sgi_application::ENTITY_NOT_FOUND_MESSAGE;
use sgi_core::{AppResult, Principal};
use sgi_domain::{EntityKind, EntityRef};

use crate::dto::{
    CreateRecordLinkRequest, ListRecordsQuery, RateCaseRequest, RecordDetailsResponse,
    RecordResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{input_id, path_id};

pub async fn create_record_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<RecordResponse>)> {
    let record = state
        .record_service
        .create_record(&principal, kind, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListRecordsQuery>,
) -> ApiResult<Json<Vec<RecordResponse>>> {
    let records = state
        .record_service
        .list_records(&principal, kind, query.into())
        .await?
        .into_iter()
        .map(RecordResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<RecordDetailsResponse>> {
    let details = state
        .record_service
        .get_record(&principal, record_ref(kind, record_id.as_str())?)
        .await?;

    Ok(Json(RecordDetailsResponse::from(details)))
}

pub async fn update_record_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<RecordResponse>> {
    let record = state
        .record_service
        .update_record(&principal, record_ref(kind, record_id.as_str())?, &payload)
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn delete_record_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .record_service
        .delete_record(&principal, record_ref(kind, record_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn link_records_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<String>,
    Json(payload): Json<CreateRecordLinkRequest>,
) -> ApiResult<StatusCode> {
    let source = record_ref(kind, record_id.as_str())?;
    let target = EntityRef::new(
        EntityKind::from_str(payload.entity_type.as_str())?,
        input_id(payload.entity_id.as_str(), "entity_id")?,
    );

    state
        .record_service
        .link_records(&principal, source, target)
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn unlink_records_handler(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Extension(principal): Extension<Principal>,
    Path((record_id, entity_type, entity_id)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let source = record_ref(kind, record_id.as_str())?;
    let target = record_ref(
        EntityKind::from_str(entity_type.as_str())?,
        entity_id.as_str(),
    )?;

    state
        .record_service
        .unlink_records(&principal, source, target)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn rate_case_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(record_id): Path<String>,
    Json(payload): Json<RateCaseRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let case = record_ref(EntityKind::Caso, record_id.as_str())?;
    let record = state
        .record_service
        .rate_case(&principal, case.id, payload.valor)
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

fn record_ref(kind: EntityKind, record_id: &str) -> AppResult<EntityRef> {
    path_id(record_id, ENTITY_NOT_FOUND_MESSAGE).map(|id| EntityRef::new(kind, id))
}
