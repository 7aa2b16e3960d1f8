use chrono::{DateTime, Utc};

use super::*;

pub async fn create_temporary_access_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTemporaryAccessRequest>,
) -> ApiResult<(StatusCode, Json<TemporaryAccessGrantResponse>)> {
    let entity = EntityRef::new(
        EntityKind::from_str(payload.entity_type.as_str())?,
        input_id(payload.entity_id.as_str(), "entity_id")?,
    );
    let expires_at = DateTime::parse_from_rfc3339(payload.expires_at.trim())
        .map_err(|error| AppError::Validation(format!("invalid expires_at: {error}")))?
        .with_timezone(&Utc);

    let grant = state
        .security_admin_service
        .create_temporary_grant(
            &principal,
            sgi_application::CreateTemporaryGrantInput {
                user_id: UserId::from_uuid(input_id(payload.user_id.as_str(), "user_id")?),
                entity,
                expires_at,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TemporaryAccessGrantResponse::from(grant)),
    ))
}

pub async fn list_temporary_access_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListTemporaryAccessQuery>,
) -> ApiResult<Json<Vec<TemporaryAccessGrantResponse>>> {
    let user_id = query
        .user_id
        .as_deref()
        .map(|value| input_id(value, "user_id").map(UserId::from_uuid))
        .transpose()?;

    let grants = state
        .security_admin_service
        .list_temporary_grants(
            &principal,
            sgi_application::ListTemporaryGrantsInput {
                user_id,
                active_only: query.active_only.unwrap_or(false),
                limit: query.limit,
                offset: query.offset,
            },
        )
        .await?
        .into_iter()
        .map(TemporaryAccessGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn purge_temporary_access_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<PurgeResultResponse>> {
    let deleted = state
        .security_admin_service
        .purge_expired_grants(&principal)
        .await?;

    Ok(Json(PurgeResultResponse { deleted }))
}
