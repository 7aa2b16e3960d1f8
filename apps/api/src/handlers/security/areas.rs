use super::*;

pub async fn list_areas_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<AreaResponse>>> {
    let areas = state
        .security_admin_service
        .list_areas(&principal)
        .await?
        .into_iter()
        .map(AreaResponse::from)
        .collect();

    Ok(Json(areas))
}

pub async fn add_area_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<AreaRequest>,
) -> ApiResult<(StatusCode, Json<AreaResponse>)> {
    let area = state
        .security_admin_service
        .add_area(&principal, payload.area.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(AreaResponse::from(area))))
}

pub async fn rename_area_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<RenameAreaRequest>,
) -> ApiResult<Json<AreaResponse>> {
    let area = state
        .security_admin_service
        .rename_area(
            &principal,
            payload.old_area.as_str(),
            payload.new_area.as_str(),
        )
        .await?;

    Ok(Json(AreaResponse::from(area)))
}

pub async fn remove_area_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<AreaRequest>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .remove_area(&principal, payload.area.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
