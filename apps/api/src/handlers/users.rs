use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use sgi_core::{AppResult, Principal, UserId};

use crate::dto::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::path_id;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(&principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users(&principal, query.limit, query.offset)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_user(&principal, user_path_id(user_id.as_str())?)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(
            &principal,
            user_path_id(user_id.as_str())?,
            payload.into(),
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(&principal, user_path_id(user_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .reset_password(
            &principal,
            user_path_id(user_id.as_str())?,
            payload.password.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn user_path_id(value: &str) -> AppResult<UserId> {
    path_id(value, "user not found").map(UserId::from_uuid)
}
