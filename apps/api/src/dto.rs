mod auth;
mod common;
mod records;
mod reports;
mod security;
mod users;

pub use auth::{
    BootstrapRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
};
pub use common::{DependencyProbe, HealthResponse, ProbeState};
pub use records::{
    CreateRecordLinkRequest, ListRecordsQuery, RecordDetailsResponse, RecordLinkResponse,
    RecordResponse,
};
pub use reports::{
    AreaModalidadResponse, AreaRecordCountsResponse, AreaReportRequest, ModalidadCountResponse,
    RateCaseRequest, RecordCountsResponse, ReportPeriodRequest, UserReportRequest,
};
pub use security::{
    AreaRequest, AreaResponse, AuditLogEntryResponse, CreateTemporaryAccessRequest,
    ListAuditLogQuery, ListTemporaryAccessQuery, PurgeResultResponse, RenameAreaRequest,
    TemporaryAccessGrantResponse,
};
pub use users::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserResponse};
