use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::dto::calendar_dto::{CalendarQuery, CalendarResponse};
use crate::repositories::activity_repository::ActivityRepository;
use crate::services::calendar_service::{build_entries, build_rows, days_between, range_bounds, week_bounds};
use crate::utils::errors::{unprocessable_error, AppError};

/// Años admitidos en las consultas del calendario
const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

fn out_of_range() -> AppError {
    unprocessable_error("Fecha fuera del rango admitido por el calendario")
}

/// Fecha pedida (por defecto hoy), dentro de `CALENDAR_YEARS`
fn requested_date(query: &CalendarQuery) -> Result<NaiveDate, AppError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    if !CALENDAR_YEARS.contains(&date.year()) {
        return Err(out_of_range());
    }
    Ok(date)
}

pub struct CalendarController {
    repository: ActivityRepository,
}

impl CalendarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ActivityRepository::new(pool),
        }
    }

    /// Semana de lunes a domingo que contiene `date` (por defecto hoy)
    pub async fn weekly(&self, query: CalendarQuery) -> Result<CalendarResponse, AppError> {
        let date = requested_date(&query)?;
        let (start, end) = week_bounds(date).ok_or_else(out_of_range)?;
        self.build(start, end, query).await
    }

    pub async fn daily(&self, query: CalendarQuery) -> Result<CalendarResponse, AppError> {
        let date = requested_date(&query)?;
        self.build(date, date, query).await
    }

    async fn build(&self, start: NaiveDate, end: NaiveDate, query: CalendarQuery) -> Result<CalendarResponse, AppError> {
        let group_by = query.group_by.unwrap_or_default();
        let (from, to) = range_bounds(start, end).ok_or_else(out_of_range)?;

        let activities = self
            .repository
            .find_in_range(from, to, query.include_cancelled.unwrap_or(false))
            .await?;
        let ids: Vec<_> = activities.iter().map(|a| a.id).collect();
        let resources = self.repository.resources_for(&ids).await?;

        let days = days_between(start, end);
        let entries = build_entries(activities, &resources);
        let rows = build_rows(&days, group_by, &entries);

        debug!("📆 Calendario {}..{} ({:?}): {} filas", start, end, group_by, rows.len());

        Ok(CalendarResponse {
            start,
            end,
            group_by,
            days,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(date: Option<NaiveDate>) -> CalendarQuery {
        CalendarQuery {
            date,
            group_by: None,
            include_cancelled: None,
        }
    }

    #[test]
    fn test_requested_date_bounds() {
        let ok = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(requested_date(&query(Some(ok))).unwrap(), ok);
        assert!(requested_date(&query(None)).is_ok());

        for date in [NaiveDate::MAX, NaiveDate::MIN, NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap()] {
            assert!(matches!(requested_date(&query(Some(date))), Err(AppError::Unprocessable(_))));
        }
    }
}
