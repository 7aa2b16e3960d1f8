use super::*;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListAuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let input = ListAuditLogInput::try_from(query)?;
    let entries = state
        .security_admin_service
        .list_audit_log(&principal, input)
        .await?;

    Ok(Json(
        entries
            .into_iter()
            .map(AuditLogEntryResponse::from)
            .collect(),
    ))
}
