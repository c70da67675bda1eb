use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::activity::ActivityStatus;

/// Criterio de agrupación de filas del calendario
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarGrouping {
    #[default]
    Driver,
    Vehicle,
    Site,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub date: Option<NaiveDate>,
    pub group_by: Option<CalendarGrouping>,
    pub include_cancelled: Option<bool>,
}

/// Actividad tal como se pinta en una celda
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarActivity {
    pub id: Uuid,
    pub title: String,
    pub client_name: String,
    pub site_name: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub drivers: Vec<String>,
    pub vehicles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub activities: Vec<CalendarActivity>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarRow {
    /// `None` para la fila de actividades sin recurso asignado
    pub key: Option<Uuid>,
    pub label: String,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub group_by: CalendarGrouping,
    pub days: Vec<NaiveDate>,
    pub rows: Vec<CalendarRow>,
}
