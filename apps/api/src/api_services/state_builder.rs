use std::sync::Arc;

use sgi_application::{
    AccessControlService, AuthService, RecordService, SecurityAdminRepositories,
    SecurityAdminService, UserService, UserServiceDependencies,
};
use sgi_core::AppError;
#[cfg(test)]
use sgi_infrastructure::{InMemoryStore, JwtSettings};
use sgi_infrastructure::{Argon2PasswordHasher, JwtAccessTokenCodec};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;

use repositories::RepositorySet;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let repositories = repositories::build_repository_set(&pool);
    let token_codec = JwtAccessTokenCodec::new(config.jwt_settings())?;

    Ok(assemble_state(
        repositories,
        token_codec,
        config.bootstrap_token.clone(),
        Some(pool),
    ))
}

/// Wires every service over a single in-memory store.
#[cfg(test)]
pub fn build_in_memory_state(
    store: Arc<InMemoryStore>,
    jwt_settings: JwtSettings,
    bootstrap_token: Option<String>,
) -> Result<AppState, AppError> {
    let repositories = repositories::in_memory_repository_set(&store);
    let token_codec = JwtAccessTokenCodec::new(jwt_settings)?;

    Ok(assemble_state(
        repositories,
        token_codec,
        bootstrap_token,
        None,
    ))
}

fn assemble_state(
    repositories: RepositorySet,
    token_codec: JwtAccessTokenCodec,
    bootstrap_token: Option<String>,
    postgres_pool: Option<PgPool>,
) -> AppState {
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let access_control = AccessControlService::new(repositories.authorization_repository);

    AppState {
        record_service: RecordService::new(
            access_control.clone(),
            repositories.record_repository,
            repositories.audit_repository.clone(),
        ),
        security_admin_service: SecurityAdminService::new(
            access_control,
            SecurityAdminRepositories {
                grants: repositories.grant_repository,
                areas: repositories.area_repository.clone(),
                users: repositories.user_repository.clone(),
                audit_log: repositories.audit_log_repository,
                audit: repositories.audit_repository.clone(),
            },
        ),
        user_service: UserService::new(
            UserServiceDependencies {
                users: repositories.user_repository.clone(),
                areas: repositories.area_repository,
                password_hasher: password_hasher.clone(),
                audit: repositories.audit_repository,
            },
            bootstrap_token,
        ),
        auth_service: AuthService::new(
            repositories.user_repository,
            password_hasher,
            Arc::new(token_codec),
        ),
        postgres_pool,
    }
}
