use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// Contadores del panel principal
#[derive(Debug, Serialize, FromRow)]
pub struct DashboardCounts {
    pub activities_today: i64,
    pub activities_in_progress: i64,
    pub deadlines_overdue: i64,
    pub deadlines_due_soon: i64,
    pub active_drivers: i64,
    pub active_vehicles: i64,
    pub documents_expiring: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub horizon_days: i64,
    #[serde(flatten)]
    pub counts: DashboardCounts,
}
