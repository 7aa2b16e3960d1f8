//! Application services and ports.

#![forbid(unsafe_code)]

mod access_control_service;
mod area_ports;
mod audit_ports;
mod auth_service;
mod record_ports;
mod record_service;
mod security_admin_service;
mod temporary_access_ports;
mod user_ports;
mod user_service;

pub use access_control_service::{
    AREA_DENIED_MESSAGE, AccessBasis, AccessControlService, AccessTarget, AuthorizationContext,
    AuthorizationRepository, AuthorizedEntity, ENTITY_NOT_FOUND_MESSAGE, RoleGate,
};
pub use area_ports::AreaRepository;
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use auth_service::{
    AccessTokenCodec, AuthService, INVALID_CREDENTIALS_MESSAGE, IssuedToken, LoginTokens,
    TokenClaims, TokenKind,
};
pub use record_ports::{
    RecordCount, RecordCountQuery, RecordFieldFilter, RecordQuery, RecordRepository,
};
pub use record_service::{
    AreaModalidadCounts, AreaRecordCounts, DEFAULT_RECORD_PAGE_SIZE, KindCounts, ListRecordsInput,
    MAX_RECORD_PAGE_SIZE, ModalidadCount, REPORT_SCOPE_MESSAGE, RecordDetails, RecordOperation,
    RecordService,
};
pub use security_admin_service::{
    DEFAULT_ADMIN_PAGE_SIZE, ListAuditLogInput, ListTemporaryGrantsInput, MAX_ADMIN_PAGE_SIZE,
    SecurityAdminRepositories, SecurityAdminService,
};
pub use temporary_access_ports::{
    CreateTemporaryGrantInput, TemporaryGrantQuery, TemporaryGrantRepository,
};
pub use user_ports::{PasswordHasher, UserRecord, UserRepository};
pub use user_service::{
    CreateUserInput, DEFAULT_USER_PAGE_SIZE, UpdateUserInput, UserService,
    UserServiceDependencies,
};
