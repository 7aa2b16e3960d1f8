//! Management statistics over records created in a period.

use axum::Json;
use axum::extract::{Extension, State};
use sgi_core::{AppResult, Principal, UserId};

use crate::dto::{
    AreaModalidadResponse, AreaRecordCountsResponse, AreaReportRequest, RecordCountsResponse,
    ReportPeriodRequest, UserReportRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::input_id;

pub async fn area_report_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<AreaReportRequest>,
) -> ApiResult<Json<RecordCountsResponse>> {
    let counts = state
        .record_service
        .area_report(&principal, payload.area.as_str(), payload.period()?)
        .await?;

    Ok(Json(RecordCountsResponse::from(counts)))
}

pub async fn report_by_area_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ReportPeriodRequest>,
) -> ApiResult<Json<Vec<AreaRecordCountsResponse>>> {
    let areas = state
        .record_service
        .report_by_area(&principal, payload.period()?)
        .await?
        .into_iter()
        .map(AreaRecordCountsResponse::from)
        .collect();

    Ok(Json(areas))
}

pub async fn modalidad_report_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ReportPeriodRequest>,
) -> ApiResult<Json<Vec<AreaModalidadResponse>>> {
    let areas = state
        .record_service
        .modalidad_report(&principal, payload.period()?)
        .await?
        .into_iter()
        .map(AreaModalidadResponse::from)
        .collect();

    Ok(Json(areas))
}

pub async fn user_report_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UserReportRequest>,
) -> ApiResult<Json<RecordCountsResponse>> {
    let counts = state
        .record_service
        .user_report(&principal, report_user(&principal, &payload)?, payload.period()?)
        .await?;

    Ok(Json(RecordCountsResponse::from(counts)))
}

pub async fn user_modalidad_report_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UserReportRequest>,
) -> ApiResult<Json<Vec<AreaModalidadResponse>>> {
    let areas = state
        .record_service
        .user_modalidad_report(&principal, report_user(&principal, &payload)?, payload.period()?)
        .await?
        .into_iter()
        .map(AreaModalidadResponse::from)
        .collect();

    Ok(Json(areas))
}

fn report_user(principal: &Principal, payload: &UserReportRequest) -> AppResult<UserId> {
    match payload.user_id.as_deref() {
        Some(user_id) => input_id(user_id, "user_id").map(UserId::from_uuid),
        None => Ok(principal.user_id()),
    }
}
