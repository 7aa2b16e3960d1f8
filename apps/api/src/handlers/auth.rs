use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{
    BootstrapRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let tokens = state
        .auth_service
        .login(payload.correo.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(LoginResponse::from(tokens)))
}

pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let token = state
        .auth_service
        .refresh(payload.refresh_token.as_str())
        .await?;

    Ok(Json(RefreshTokenResponse::from(token)))
}

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .bootstrap_admin(payload.token.as_str(), payload.user.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
