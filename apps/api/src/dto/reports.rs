use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sgi_application::{AreaModalidadCounts, AreaRecordCounts, KindCounts, ModalidadCount};
use sgi_core::AppError;
use sgi_domain::ReportPeriod;
use ts_rs::TS;

/// Incoming `YYYY-MM-DD` period bounds, both inclusive.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/report-period-request.ts"
)]
pub struct ReportPeriodRequest {
    pub start_date: String,
    pub end_date: String,
}

impl ReportPeriodRequest {
    pub fn period(&self) -> Result<ReportPeriod, AppError> {
        ReportPeriod::parse(self.start_date.as_str(), self.end_date.as_str())
    }
}

/// Incoming payload for one area's totals.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/area-report-request.ts"
)]
pub struct AreaReportRequest {
    pub area: String,
    pub start_date: String,
    pub end_date: String,
}

impl AreaReportRequest {
    pub fn period(&self) -> Result<ReportPeriod, AppError> {
        ReportPeriod::parse(self.start_date.as_str(), self.end_date.as_str())
    }
}

/// Incoming payload for one user's totals. `user_id` defaults to the caller.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-report-request.ts"
)]
pub struct UserReportRequest {
    #[ts(optional)]
    pub user_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

impl UserReportRequest {
    pub fn period(&self) -> Result<ReportPeriod, AppError> {
        ReportPeriod::parse(self.start_date.as_str(), self.end_date.as_str())
    }
}

/// Record totals keyed by collection route segment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/record-counts-response.ts"
)]
pub struct RecordCountsResponse {
    #[ts(type = "Record<string, number>")]
    pub counts: BTreeMap<String, u64>,
}

impl From<KindCounts> for RecordCountsResponse {
    fn from(value: KindCounts) -> Self {
        Self {
            counts: by_segment(value),
        }
    }
}

/// Record totals of one area.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/area-record-counts-response.ts"
)]
pub struct AreaRecordCountsResponse {
    pub area: String,
    #[ts(type = "Record<string, number>")]
    pub counts: BTreeMap<String, u64>,
}

impl From<AreaRecordCounts> for AreaRecordCountsResponse {
    fn from(value: AreaRecordCounts) -> Self {
        Self {
            area: value.area,
            counts: by_segment(value.counts),
        }
    }
}

/// Records sharing one modality. `modalidad` is null for records without one.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/modalidad-count-response.ts"
)]
pub struct ModalidadCountResponse {
    pub modalidad: Option<String>,
    #[ts(type = "number")]
    pub count: u64,
}

impl From<ModalidadCount> for ModalidadCountResponse {
    fn from(value: ModalidadCount) -> Self {
        Self {
            modalidad: value.modalidad,
            count: value.count,
        }
    }
}

/// Case and incident report totals of one area, grouped by modality.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/area-modalidad-response.ts"
)]
pub struct AreaModalidadResponse {
    pub area: String,
    pub casos: Vec<ModalidadCountResponse>,
    pub iios: Vec<ModalidadCountResponse>,
}

impl From<AreaModalidadCounts> for AreaModalidadResponse {
    fn from(value: AreaModalidadCounts) -> Self {
        Self {
            area: value.area,
            casos: value.casos.into_iter().map(Into::into).collect(),
            iios: value.iios.into_iter().map(Into::into).collect(),
        }
    }
}

/// Incoming case rating.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rate-case-request.ts"
)]
pub struct RateCaseRequest {
    #[ts(type = "number")]
    pub valor: i64,
}

fn by_segment(counts: KindCounts) -> BTreeMap<String, u64> {
    counts
        .into_iter()
        .map(|(kind, count)| (kind.route_segment().to_owned(), count))
        .collect()
}
