//! Modelo de Activity
//!
//! Una actividad es un trabajo programado para un cliente (y opcionalmente
//! una de sus sedes) con conductores y vehículos asignados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la actividad - mapea al ENUM activity_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "activity_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl ActivityStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActivityStatus::Completed)
    }

    /// Las actividades canceladas no ocupan recursos
    pub fn blocks_resources(&self) -> bool {
        !matches!(self, ActivityStatus::Cancelled)
    }
}

/// Activity - mapea a la tabla activities
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub client_id: Uuid,
    pub site_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Actividad con los nombres de cliente y sede ya resueltos (JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct ActivityWithNames {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub site_id: Option<Uuid>,
    pub site_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Asignación de recurso con etiquetas, resultado del JOIN con drivers/vehicles
#[derive(Debug, Clone, FromRow)]
pub struct ActivityResourceRow {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub driver_first_name: Option<String>,
    pub driver_last_name: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub vehicle_plate: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
}

impl ActivityResourceRow {
    pub fn driver_label(&self) -> Option<String> {
        match (&self.driver_first_name, &self.driver_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    pub fn vehicle_label(&self) -> Option<String> {
        self.vehicle_plate.as_deref().map(|plate| {
            super::vehicle::vehicle_label(plate, self.vehicle_brand.as_deref(), self.vehicle_model.as_deref())
        })
    }
}

/// Intervalo semiabierto `[start, end)` ocupado por una actividad
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_half_open() {
        assert!(intervals_overlap(at(8), at(12), at(11), at(14)));
        assert!(intervals_overlap(at(8), at(12), at(9), at(10)));
        assert!(!intervals_overlap(at(8), at(12), at(12), at(14)));
        assert!(!intervals_overlap(at(14), at(16), at(8), at(14)));
    }

    #[test]
    fn test_cancelled_does_not_block() {
        assert!(ActivityStatus::Planned.blocks_resources());
        assert!(ActivityStatus::Completed.blocks_resources());
        assert!(!ActivityStatus::Cancelled.blocks_resources());
    }
}
