use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::dto::dashboard_dto::DashboardCounts;
use crate::utils::errors::AppError;

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Contadores del día `today` (`[day_start, day_end)` en UTC) con un
    /// horizonte de `horizon` para vencimientos y documentos
    pub async fn counts(
        &self,
        today: NaiveDate,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        horizon: NaiveDate,
    ) -> Result<DashboardCounts, AppError> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM activities
                 WHERE deleted_at IS NULL AND status <> 'cancelled'
                 AND start_at < $3 AND $2 < end_at) AS activities_today,
                (SELECT COUNT(*) FROM activities
                 WHERE deleted_at IS NULL AND status = 'in_progress') AS activities_in_progress,
                (SELECT COUNT(*) FROM vehicle_deadlines d JOIN vehicles v ON v.id = d.vehicle_id
                 WHERE d.deleted_at IS NULL AND v.deleted_at IS NULL
                 AND d.status = 'pending' AND d.due_date < $1) AS deadlines_overdue,
                (SELECT COUNT(*) FROM vehicle_deadlines d JOIN vehicles v ON v.id = d.vehicle_id
                 WHERE d.deleted_at IS NULL AND v.deleted_at IS NULL
                 AND d.status = 'pending' AND d.due_date >= $1 AND d.due_date <= $4) AS deadlines_due_soon,
                (SELECT COUNT(*) FROM drivers
                 WHERE deleted_at IS NULL AND status = 'active') AS active_drivers,
                (SELECT COUNT(*) FROM vehicles
                 WHERE deleted_at IS NULL AND status = 'active') AS active_vehicles,
                (SELECT COUNT(*) FROM documents
                 WHERE deleted_at IS NULL AND expires_on IS NOT NULL
                 AND expires_on >= $1 AND expires_on <= $4) AS documents_expiring
            "#,
        )
        .bind(today)
        .bind(day_start)
        .bind(day_end)
        .bind(horizon)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
