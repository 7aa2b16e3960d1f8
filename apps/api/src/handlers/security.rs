use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use sgi_application::ListAuditLogInput;
use sgi_core::{AppError, Principal, UserId};
use sgi_domain::{EntityKind, EntityRef};

use crate::dto::{
    AreaRequest, AreaResponse, AuditLogEntryResponse, CreateTemporaryAccessRequest,
    ListAuditLogQuery, ListTemporaryAccessQuery, PurgeResultResponse, RenameAreaRequest,
    TemporaryAccessGrantResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::input_id;

mod areas;
mod audit;
mod temporary_access;

pub use areas::{add_area_handler, list_areas_handler, remove_area_handler, rename_area_handler};
pub use audit::list_audit_log_handler;
pub use temporary_access::{
    create_temporary_access_handler, list_temporary_access_handler,
    purge_temporary_access_handler,
};
