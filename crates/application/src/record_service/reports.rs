use std::collections::BTreeMap;

use sgi_core::{AppError, AppResult, Principal, UserId};
use sgi_domain::{EntityKind, MODALIDAD_KINDS, ReportPeriod};

use crate::{RecordCount, RecordCountQuery};

use super::{RecordOperation, RecordService};

/// Returned when a non-admin asks for another area's statistics.
pub const REPORT_SCOPE_MESSAGE: &str = "reports are limited to your own area";

/// Record totals per kind. Every kind is present, including zero totals.
pub type KindCounts = BTreeMap<EntityKind, u64>;

/// Record totals of one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecordCounts {
    /// Owning area.
    pub area: String,
    /// Totals per kind.
    pub counts: KindCounts,
}

/// Records sharing one `modalidad` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalidadCount {
    /// Modality, or `None` for records without one.
    pub modalidad: Option<String>,
    /// Number of records.
    pub count: u64,
}

/// Case and incident report totals of one area, grouped by modality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaModalidadCounts {
    /// Owning area.
    pub area: String,
    /// Cases per modality.
    pub casos: Vec<ModalidadCount>,
    /// Incident reports per modality.
    pub iios: Vec<ModalidadCount>,
}

impl RecordService {
    /// Counts the records one area created during `period`.
    pub async fn area_report(
        &self,
        actor: &Principal,
        area: &str,
        period: ReportPeriod,
    ) -> AppResult<KindCounts> {
        let area = report_scope(actor, Some(area))?;
        let counts = self.count(period, area, None, false).await?;
        Ok(kind_totals(&counts))
    }

    /// Counts records per area. Only areas with records in `period` are listed.
    pub async fn report_by_area(
        &self,
        actor: &Principal,
        period: ReportPeriod,
    ) -> AppResult<Vec<AreaRecordCounts>> {
        let area = report_scope(actor, None)?;
        let counts = self.count(period, area, None, false).await?;
        Ok(per_area(counts))
    }

    /// Counts cases and incident reports per area and modality.
    pub async fn modalidad_report(
        &self,
        actor: &Principal,
        period: ReportPeriod,
    ) -> AppResult<Vec<AreaModalidadCounts>> {
        let area = report_scope(actor, None)?;
        let counts = self.count(period, area, None, true).await?;
        Ok(per_area_modalidad(counts))
    }

    /// Counts the records one user created during `period`.
    pub async fn user_report(
        &self,
        actor: &Principal,
        user_id: UserId,
        period: ReportPeriod,
    ) -> AppResult<KindCounts> {
        let area = report_scope(actor, None)?;
        let counts = self.count(period, area, Some(user_id), false).await?;
        Ok(kind_totals(&counts))
    }

    /// Counts one user's cases and incident reports per area and modality.
    pub async fn user_modalidad_report(
        &self,
        actor: &Principal,
        user_id: UserId,
        period: ReportPeriod,
    ) -> AppResult<Vec<AreaModalidadCounts>> {
        let area = report_scope(actor, None)?;
        let counts = self.count(period, area, Some(user_id), true).await?;
        Ok(per_area_modalidad(counts))
    }

    async fn count(
        &self,
        period: ReportPeriod,
        area: Option<String>,
        user_id: Option<UserId>,
        by_modalidad: bool,
    ) -> AppResult<Vec<RecordCount>> {
        let kinds = if by_modalidad {
            MODALIDAD_KINDS.to_vec()
        } else {
            EntityKind::all().to_vec()
        };

        self.repository
            .count_records(RecordCountQuery {
                kinds,
                period,
                area,
                user_id,
                by_modalidad,
            })
            .await
    }
}

/// Resolves the area a report may cover. Admins see every area unless they name one.
fn report_scope(actor: &Principal, requested: Option<&str>) -> AppResult<Option<String>> {
    RecordOperation::Report.gate().check(actor, None)?;

    let requested = requested.map(str::trim);
    if actor.is_admin() {
        return Ok(requested.map(str::to_owned));
    }

    match requested {
        Some(area) if area != actor.area() => {
            Err(AppError::Forbidden(REPORT_SCOPE_MESSAGE.to_owned()))
        }
        _ => Ok(Some(actor.area().to_owned())),
    }
}

fn zeroed() -> KindCounts {
    EntityKind::all().into_iter().map(|kind| (kind, 0)).collect()
}

fn kind_totals(counts: &[RecordCount]) -> KindCounts {
    let mut totals = zeroed();
    for count in counts {
        *totals.entry(count.kind).or_default() += count.count;
    }
    totals
}

fn per_area(counts: Vec<RecordCount>) -> Vec<AreaRecordCounts> {
    let mut areas: BTreeMap<String, KindCounts> = BTreeMap::new();
    for count in counts {
        *areas
            .entry(count.area)
            .or_insert_with(zeroed)
            .entry(count.kind)
            .or_default() += count.count;
    }

    areas
        .into_iter()
        .map(|(area, counts)| AreaRecordCounts { area, counts })
        .collect()
}

fn per_area_modalidad(counts: Vec<RecordCount>) -> Vec<AreaModalidadCounts> {
    let mut areas: BTreeMap<String, AreaModalidadCounts> = BTreeMap::new();
    for count in counts {
        let entry = areas
            .entry(count.area.clone())
            .or_insert_with(|| AreaModalidadCounts {
                area: count.area,
                casos: Vec::new(),
                iios: Vec::new(),
            });
        let group = ModalidadCount {
            modalidad: count.modalidad,
            count: count.count,
        };
        match count.kind {
            EntityKind::Caso => entry.casos.push(group),
            EntityKind::Iio => entry.iios.push(group),
            _ => {}
        }
    }

    areas
        .into_values()
        .map(|mut area| {
            area.casos.sort_by(|a, b| a.modalidad.cmp(&b.modalidad));
            area.iios.sort_by(|a, b| a.modalidad.cmp(&b.modalidad));
            area
        })
        .collect()
}
