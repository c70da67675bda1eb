use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{Driver, DriverStatus};
use crate::utils::validation::{validate_fiscal_code, validate_not_blank, validate_phone};

// Request para crear o reemplazar (PUT) un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct DriverRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub last_name: String,

    #[validate(custom = "validate_fiscal_code")]
    pub fiscal_code: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(max = 30))]
    pub license_number: Option<String>,

    #[validate(length(max = 10))]
    pub license_category: Option<String>,

    pub license_expiry: Option<NaiveDate>,

    pub status: Option<DriverStatus>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriverFilters {
    pub search: Option<String>,
    pub status: Option<DriverStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de conductor
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub fiscal_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub license_category: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub status: DriverStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            full_name: driver.full_name(),
            id: driver.id,
            first_name: driver.first_name,
            last_name: driver.last_name,
            fiscal_code: driver.fiscal_code,
            email: driver.email,
            phone: driver.phone,
            license_number: driver.license_number,
            license_category: driver.license_category,
            license_expiry: driver.license_expiry,
            status: driver.status,
            notes: driver.notes,
            created_at: driver.created_at,
            updated_at: driver.updated_at,
        }
    }
}
