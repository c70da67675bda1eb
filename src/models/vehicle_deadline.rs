//! Modelo de VehicleDeadline
//!
//! Vencimientos de cumplimiento de un vehículo (seguro, bollo, revisión...).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de vencimiento - mapea al ENUM deadline_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "deadline_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    Insurance,
    RoadTax,
    Inspection,
    Maintenance,
    Tachograph,
    Other,
}

/// Estado del vencimiento - mapea al ENUM deadline_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "deadline_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Pending,
    Completed,
}

impl DeadlineStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, DeadlineStatus::Completed)
    }
}

/// Urgencia derivada (no persistida)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUrgency {
    Completed,
    Overdue,
    DueSoon,
    Ok,
}

impl DeadlineUrgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineUrgency::Completed => "completed",
            DeadlineUrgency::Overdue => "overdue",
            DeadlineUrgency::DueSoon => "due_soon",
            DeadlineUrgency::Ok => "ok",
        }
    }

    pub fn compute(status: DeadlineStatus, due_date: NaiveDate, reminder_days: i32, today: NaiveDate) -> Self {
        if status.is_completed() {
            return DeadlineUrgency::Completed;
        }
        let days_left = (due_date - today).num_days();
        if days_left < 0 {
            DeadlineUrgency::Overdue
        } else if days_left <= i64::from(reminder_days) {
            DeadlineUrgency::DueSoon
        } else {
            DeadlineUrgency::Ok
        }
    }
}

/// VehicleDeadline - mapea a la tabla vehicle_deadlines (con la matrícula del JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct VehicleDeadline {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub deadline_type: DeadlineType,
    pub due_date: NaiveDate,
    pub amount: Option<Decimal>,
    pub reminder_days: i32,
    pub status: DeadlineStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleDeadline {
    pub fn urgency(&self, today: NaiveDate) -> DeadlineUrgency {
        DeadlineUrgency::compute(self.status, self.due_date, self.reminder_days, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_urgency() {
        let today = day(10);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(9), 30, today), DeadlineUrgency::Overdue);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(10), 30, today), DeadlineUrgency::DueSoon);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(20), 10, today), DeadlineUrgency::DueSoon);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(21), 10, today), DeadlineUrgency::Ok);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Completed, day(1), 30, today), DeadlineUrgency::Completed);
    }

    #[test]
    fn test_zero_reminder_days() {
        let today = day(10);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(10), 0, today), DeadlineUrgency::DueSoon);
        assert_eq!(DeadlineUrgency::compute(DeadlineStatus::Pending, day(11), 0, today), DeadlineUrgency::Ok);
    }
}
