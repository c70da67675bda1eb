use chrono::{Days, Utc};
use sqlx::PgPool;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::repositories::dashboard_repository::DashboardRepository;
use crate::services::calendar_service::range_bounds;
use crate::utils::errors::AppError;

/// Días hacia delante para vencimientos y documentos próximos
pub const DASHBOARD_HORIZON_DAYS: i64 = 30;

pub struct DashboardController {
    repository: DashboardRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DashboardRepository::new(pool),
        }
    }

    pub async fn summary(&self) -> Result<DashboardResponse, AppError> {
        let today = Utc::now().date_naive();
        let (day_start, day_end) = range_bounds(today, today)
            .ok_or_else(|| AppError::Internal(format!("Fecha fuera de rango: {}", today)))?;
        let horizon = today
            .checked_add_days(Days::new(DASHBOARD_HORIZON_DAYS as u64))
            .ok_or_else(|| AppError::Internal(format!("Fecha fuera de rango: {}", today)))?;

        let counts = self.repository.counts(today, day_start, day_end, horizon).await?;

        Ok(DashboardResponse {
            date: today,
            horizon_days: DASHBOARD_HORIZON_DAYS,
            counts,
        })
    }
}
