use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use sgi_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the bearer token into a principal and attaches it to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let principal = state.auth_service.resolve_principal(token)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
