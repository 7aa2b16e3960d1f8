use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sgi_core::AppError;
use tracing::error;
use ts_rs::TS;

/// API error payload.
///
/// Area denials additionally name the area and kind of the refused entity.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    entity_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    entity_name: Option<String>,
}

impl ErrorResponse {
    fn message(error: String) -> Self {
        Self {
            error,
            entity_area: None,
            entity_name: None,
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, payload) = match self.0 {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::message(message))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::message(message)),
            AppError::Conflict(message) => (StatusCode::CONFLICT, ErrorResponse::message(message)),
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::message(message))
            }
            AppError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, ErrorResponse::message(message))
            }
            AppError::AreaForbidden(denial) => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: denial.message,
                    entity_area: Some(denial.entity_area),
                    entity_name: Some(denial.entity_name),
                },
            ),
            AppError::Internal(message) => {
                error!(%message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::message("internal server error".to_owned()),
                )
            }
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
