use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::deadline_dto::{DeadlineRequest, DEFAULT_REMINDER_DAYS};
use crate::models::vehicle_deadline::{DeadlineStatus, DeadlineType, DeadlineUrgency, VehicleDeadline};
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const DEADLINE_COLUMNS: &str = r#"
    d.id, d.vehicle_id, v.plate AS vehicle_plate, d.deadline_type, d.due_date, d.amount,
    d.reminder_days, d.status, d.completed_at, d.notes, d.created_at, d.updated_at
"#;

// $6 es la fecha de referencia para la urgencia
const DEADLINE_FILTERS: &str = r#"
    d.deleted_at IS NULL AND v.deleted_at IS NULL
    AND ($1::uuid IS NULL OR d.vehicle_id = $1)
    AND ($2::deadline_status IS NULL OR d.status = $2)
    AND ($3::deadline_type IS NULL OR d.deadline_type = $3)
    AND ($4::date IS NULL OR d.due_date <= $4)
    AND (
        $5::text IS NULL
        OR ($5 = 'completed' AND d.status = 'completed')
        OR ($5 = 'overdue' AND d.status = 'pending' AND d.due_date < $6)
        OR ($5 = 'due_soon' AND d.status = 'pending' AND d.due_date >= $6
            AND d.due_date <= $6 + d.reminder_days)
        OR ($5 = 'ok' AND d.status = 'pending' AND d.due_date > $6 + d.reminder_days)
    )
"#;

/// Filtros ya resueltos del listado de vencimientos
pub struct DeadlineQuery {
    pub vehicle_id: Option<Uuid>,
    pub status: Option<DeadlineStatus>,
    pub deadline_type: Option<DeadlineType>,
    pub due_before: Option<NaiveDate>,
    pub urgency: Option<DeadlineUrgency>,
    pub today: NaiveDate,
}

pub struct VehicleDeadlineRepository {
    pool: PgPool,
}

impl VehicleDeadlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleDeadline>, AppError> {
        let deadline = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            SELECT {} FROM vehicle_deadlines d
            JOIN vehicles v ON v.id = d.vehicle_id
            WHERE d.id = $1 AND d.deleted_at IS NULL
            "#,
            DEADLINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deadline)
    }

    pub async fn list(
        &self,
        query: &DeadlineQuery,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VehicleDeadline>, i64), AppError> {
        let urgency = query.urgency.map(|u| u.as_str());

        let (total,): (i64,) = sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*) FROM vehicle_deadlines d
            JOIN vehicles v ON v.id = d.vehicle_id
            WHERE {}
            "#,
            DEADLINE_FILTERS
        ))
        .bind(query.vehicle_id)
        .bind(query.status)
        .bind(query.deadline_type)
        .bind(query.due_before)
        .bind(urgency)
        .bind(query.today)
        .fetch_one(&self.pool)
        .await?;

        let deadlines = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            SELECT {} FROM vehicle_deadlines d
            JOIN vehicles v ON v.id = d.vehicle_id
            WHERE {}
            ORDER BY d.due_date ASC, d.id ASC
            LIMIT $7 OFFSET $8
            "#,
            DEADLINE_COLUMNS, DEADLINE_FILTERS
        ))
        .bind(query.vehicle_id)
        .bind(query.status)
        .bind(query.deadline_type)
        .bind(query.due_before)
        .bind(urgency)
        .bind(query.today)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((deadlines, total))
    }

    /// Todos los vencimientos vivos de un vehículo
    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<VehicleDeadline>, AppError> {
        let deadlines = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            SELECT {} FROM vehicle_deadlines d
            JOIN vehicles v ON v.id = d.vehicle_id
            WHERE d.vehicle_id = $1 AND d.deleted_at IS NULL
            ORDER BY d.due_date ASC
            "#,
            DEADLINE_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deadlines)
    }

    pub async fn create(
        &self,
        request: DeadlineRequest,
        status: DeadlineStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<VehicleDeadline, AppError> {
        let deadline = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            WITH d AS (
                INSERT INTO vehicle_deadlines (id, vehicle_id, deadline_type, due_date, amount,
                                               reminder_days, status, completed_at, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            SELECT {} FROM d JOIN vehicles v ON v.id = d.vehicle_id
            "#,
            DEADLINE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(request.vehicle_id)
        .bind(request.deadline_type)
        .bind(request.due_date)
        .bind(request.amount)
        .bind(request.reminder_days.unwrap_or(DEFAULT_REMINDER_DAYS))
        .bind(status)
        .bind(completed_at)
        .bind(clean_optional(request.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(deadline)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: DeadlineRequest,
        status: DeadlineStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<VehicleDeadline>, AppError> {
        let deadline = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            WITH d AS (
                UPDATE vehicle_deadlines
                SET vehicle_id = $2, deadline_type = $3, due_date = $4, amount = $5,
                    reminder_days = $6, status = $7, completed_at = $8, notes = $9,
                    updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
            )
            SELECT {} FROM d JOIN vehicles v ON v.id = d.vehicle_id
            "#,
            DEADLINE_COLUMNS
        ))
        .bind(id)
        .bind(request.vehicle_id)
        .bind(request.deadline_type)
        .bind(request.due_date)
        .bind(request.amount)
        .bind(request.reminder_days.unwrap_or(DEFAULT_REMINDER_DAYS))
        .bind(status)
        .bind(completed_at)
        .bind(clean_optional(request.notes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(deadline)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: DeadlineStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<VehicleDeadline>, AppError> {
        let deadline = sqlx::query_as::<_, VehicleDeadline>(&format!(
            r#"
            WITH d AS (
                UPDATE vehicle_deadlines
                SET status = $2, completed_at = $3, updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
            )
            SELECT {} FROM d JOIN vehicles v ON v.id = d.vehicle_id
            "#,
            DEADLINE_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deadline)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE vehicle_deadlines SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
