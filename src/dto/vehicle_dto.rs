use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::validation::validate_plate;

// Request para crear o reemplazar (PUT) un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct VehicleRequest {
    #[validate(custom = "validate_plate")]
    pub plate: String,

    #[validate(length(max = 100))]
    pub brand: Option<String>,

    #[validate(length(max = 100))]
    pub model: Option<String>,

    #[validate(length(max = 50))]
    pub vehicle_type: Option<String>,

    #[validate(range(min = 1950, max = 2100))]
    pub registration_year: Option<i32>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    pub status: Option<VehicleStatus>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub search: Option<String>,
    pub status: Option<VehicleStatus>,
    pub vehicle_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub label: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_type: Option<String>,
    pub registration_year: Option<i32>,
    pub mileage: i32,
    pub status: VehicleStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            label: vehicle.label(),
            id: vehicle.id,
            plate: vehicle.plate,
            brand: vehicle.brand,
            model: vehicle.model,
            vehicle_type: vehicle.vehicle_type,
            registration_year: vehicle.registration_year,
            mileage: vehicle.mileage,
            status: vehicle.status,
            notes: vehicle.notes,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(plate: &str, year: Option<i32>) -> VehicleRequest {
        VehicleRequest {
            plate: plate.to_string(),
            brand: Some("Iveco".into()),
            model: Some("Daily".into()),
            vehicle_type: Some("van".into()),
            registration_year: year,
            mileage: Some(12_000),
            status: None,
            notes: None,
        }
    }

    #[test]
    fn test_valid_vehicle_request() {
        assert!(request("AB123CD", Some(2019)).validate().is_ok());
    }

    #[test]
    fn test_invalid_plate_and_year() {
        let errors = request("??", Some(1900)).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("plate"));
        assert!(fields.contains_key("registration_year"));
    }
}
