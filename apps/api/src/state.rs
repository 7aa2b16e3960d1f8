use sgi_application::{AuthService, RecordService, SecurityAdminService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub record_service: RecordService,
    pub security_admin_service: SecurityAdminService,
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub postgres_pool: Option<PgPool>,
}
