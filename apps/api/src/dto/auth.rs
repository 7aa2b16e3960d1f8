use serde::{Deserialize, Serialize};
use sgi_application::{IssuedToken, LoginTokens};
use ts_rs::TS;

use super::users::CreateUserRequest;

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub correo: String,
    pub password: String,
}

/// Tokens returned by a successful login.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
    pub id: String,
}

impl From<LoginTokens> for LoginResponse {
    fn from(value: LoginTokens) -> Self {
        Self {
            access_token: value.access.token,
            refresh_token: value.refresh.token,
            expires_at: value.access.expires_at.to_rfc3339(),
            id: value.user_id.to_string(),
        }
    }
}

/// Incoming payload for access token renewal.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/refresh-token-request.ts"
)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Renewed access token.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/refresh-token-response.ts"
)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_at: String,
}

impl From<IssuedToken> for RefreshTokenResponse {
    fn from(value: IssuedToken) -> Self {
        Self {
            access_token: value.token,
            expires_at: value.expires_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for first administrator bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    #[serde(flatten)]
    pub user: CreateUserRequest,
}
