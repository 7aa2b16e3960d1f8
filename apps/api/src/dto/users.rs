use serde::{Deserialize, Serialize};
use sgi_application::{CreateUserInput, UpdateUserInput, UserRecord};
use ts_rs::TS;

/// Incoming payload for user creation.
///
/// `nivel` is the role name and may be omitted during bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub nombre: String,
    pub apellido: String,
    #[ts(optional)]
    pub cedula: Option<String>,
    #[ts(optional)]
    pub telefono: Option<String>,
    pub correo: String,
    pub password: String,
    #[serde(default)]
    pub nivel: String,
    pub area: String,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            nombre: value.nombre,
            apellido: value.apellido,
            cedula: value.cedula,
            telefono: value.telefono,
            email: value.correo,
            password: value.password,
            role: value.nivel,
            area: value.area,
        }
    }
}

/// Incoming payload for partial user updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    #[ts(optional)]
    pub nombre: Option<String>,
    #[ts(optional)]
    pub apellido: Option<String>,
    #[ts(optional)]
    pub cedula: Option<String>,
    #[ts(optional)]
    pub telefono: Option<String>,
    #[ts(optional)]
    pub correo: Option<String>,
    #[ts(optional)]
    pub nivel: Option<String>,
    #[ts(optional)]
    pub area: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            nombre: value.nombre,
            apellido: value.apellido,
            cedula: value.cedula,
            telefono: value.telefono,
            email: value.correo,
            role: value.nivel,
            area: value.area,
        }
    }
}

/// Incoming payload for administrative password resets.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/reset-password-request.ts"
)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// API representation of a user account. Never carries the password hash.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub cedula: Option<String>,
    pub telefono: Option<String>,
    pub correo: String,
    pub nivel: String,
    pub area: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            nombre: value.nombre,
            apellido: value.apellido,
            cedula: value.cedula,
            telefono: value.telefono,
            correo: value.email,
            nivel: value.role.as_str().to_owned(),
            area: value.area,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
