//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    OutOfService,
}

/// Vehicle - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub registration_year: Option<i32>,
    pub mileage: i32,
    pub status: VehicleStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    /// Etiqueta para calendarios y selectores: "AB123CD · Iveco Daily"
    pub fn label(&self) -> String {
        vehicle_label(&self.plate, self.brand.as_deref(), self.model.as_deref())
    }
}

pub fn vehicle_label(plate: &str, brand: Option<&str>, model: Option<&str>) -> String {
    let description = [brand, model]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if description.is_empty() {
        plate.to_string()
    } else {
        format!("{} · {}", plate, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_label() {
        assert_eq!(vehicle_label("AB123CD", Some("Iveco"), Some("Daily")), "AB123CD · Iveco Daily");
        assert_eq!(vehicle_label("AB123CD", None, Some("Daily")), "AB123CD · Daily");
        assert_eq!(vehicle_label("AB123CD", None, None), "AB123CD");
    }
}
