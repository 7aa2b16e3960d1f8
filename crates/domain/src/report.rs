use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sgi_core::{AppError, AppResult};

use crate::EntityKind;

/// Day format accepted for report periods.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Attribute grouped by modality reports.
pub const MODALIDAD_FIELD: &str = "modalidad";

/// Kinds that carry a `modalidad` attribute.
pub const MODALIDAD_KINDS: [EntityKind; 2] = [EntityKind::Caso, EntityKind::Iio];

/// Inclusive range of calendar days, read in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl ReportPeriod {
    /// Creates a period covering `first_day` through `last_day`.
    pub fn new(first_day: NaiveDate, last_day: NaiveDate) -> AppResult<Self> {
        if first_day > last_day {
            return Err(AppError::Validation(
                "start_date must not be after end_date".to_owned(),
            ));
        }

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// Parses `YYYY-MM-DD` bounds.
    pub fn parse(start_date: &str, end_date: &str) -> AppResult<Self> {
        Self::new(
            parse_day(start_date, "start_date")?,
            parse_day(end_date, "end_date")?,
        )
    }

    /// First instant inside the period.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.first_day.and_time(NaiveTime::MIN).and_utc()
    }

    /// First instant after the period.
    #[must_use]
    pub fn ends_before(&self) -> DateTime<Utc> {
        self.last_day
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    /// Returns whether `instant` falls on one of the period's days.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.starts_at() && instant < self.ends_before()
    }
}

fn parse_day(raw: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::ReportPeriod;

    fn at(day: u32, month: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        let Some(instant) = Utc
            .with_ymd_and_hms(2026, month, day, hour, minute, second)
            .single()
        else {
            panic!("fixture instant should exist");
        };
        instant
    }

    #[test]
    fn last_day_is_included_until_midnight() {
        let Ok(period) = ReportPeriod::parse("2026-03-01", "2026-03-31") else {
            panic!("valid period should parse");
        };

        assert!(period.contains(at(1, 3, 0, 0, 0)));
        assert!(period.contains(at(31, 3, 23, 59, 59)));
        assert!(!period.contains(at(1, 4, 0, 0, 0)));
        assert!(!period.contains(at(28, 2, 23, 59, 59)));
    }

    #[test]
    fn single_day_period_is_allowed() {
        assert!(ReportPeriod::parse("2026-03-01", "2026-03-01").is_ok());
    }

    #[test]
    fn reversed_or_malformed_bounds_are_rejected() {
        assert!(ReportPeriod::parse("2026-03-02", "2026-03-01").is_err());
        assert!(ReportPeriod::parse("01/03/2026", "2026-03-31").is_err());
    }
}
