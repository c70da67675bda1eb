use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::vehicle_deadline::{DeadlineStatus, DeadlineType, DeadlineUrgency, VehicleDeadline};
use crate::utils::validation::validate_non_negative;

pub const DEFAULT_REMINDER_DAYS: i32 = 30;

fn validate_deadline(request: &DeadlineRequest) -> Result<(), ValidationError> {
    match &request.amount {
        Some(amount) => validate_non_negative(amount),
        None => Ok(()),
    }
}

// Request para crear o reemplazar (PUT) un vencimiento
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_deadline"))]
pub struct DeadlineRequest {
    pub vehicle_id: Uuid,

    pub deadline_type: DeadlineType,

    pub due_date: NaiveDate,

    pub amount: Option<Decimal>,

    #[validate(range(min = 0, max = 365))]
    pub reminder_days: Option<i32>,

    pub status: Option<DeadlineStatus>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeadlineFilters {
    pub vehicle_id: Option<Uuid>,
    pub status: Option<DeadlineStatus>,
    pub deadline_type: Option<DeadlineType>,
    pub due_before: Option<NaiveDate>,
    pub urgency: Option<DeadlineUrgency>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de vencimiento
#[derive(Debug, Serialize)]
pub struct DeadlineResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub deadline_type: DeadlineType,
    pub due_date: NaiveDate,
    pub days_left: i64,
    pub amount: Option<Decimal>,
    pub reminder_days: i32,
    pub status: DeadlineStatus,
    pub urgency: DeadlineUrgency,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeadlineResponse {
    pub fn from_model(deadline: VehicleDeadline, today: NaiveDate) -> Self {
        Self {
            urgency: deadline.urgency(today),
            days_left: (deadline.due_date - today).num_days(),
            id: deadline.id,
            vehicle_id: deadline.vehicle_id,
            vehicle_plate: deadline.vehicle_plate,
            deadline_type: deadline.deadline_type,
            due_date: deadline.due_date,
            amount: deadline.amount,
            reminder_days: deadline.reminder_days,
            status: deadline.status,
            completed_at: deadline.completed_at,
            notes: deadline.notes,
            created_at: deadline.created_at,
            updated_at: deadline.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: Option<Decimal>, reminder_days: Option<i32>) -> DeadlineRequest {
        DeadlineRequest {
            vehicle_id: Uuid::new_v4(),
            deadline_type: DeadlineType::Insurance,
            due_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            amount,
            reminder_days,
            status: None,
            notes: None,
        }
    }

    #[test]
    fn test_amount_must_not_be_negative() {
        assert!(request(Some(Decimal::new(45000, 2)), Some(30)).validate().is_ok());
        assert!(request(Some(Decimal::new(-1, 0)), None).validate().is_err());
    }

    #[test]
    fn test_reminder_days_range() {
        assert!(request(None, Some(400)).validate().is_err());
        assert!(request(None, Some(0)).validate().is_ok());
    }
}
