use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::driver_dto::DriverRequest;
use crate::models::driver::{Driver, DriverStatus};
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const DRIVER_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1
         OR (first_name || ' ' || last_name) ILIKE $1 OR fiscal_code ILIKE $1)
    AND ($2::driver_status IS NULL OR status = $2)
"#;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    /// Conductores vivos entre los ids indicados
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn find_active(&self) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT * FROM drivers
            WHERE status = 'active' AND deleted_at IS NULL
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn fiscal_code_taken(&self, fiscal_code: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM drivers
                WHERE fiscal_code = $1 AND deleted_at IS NULL
                AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(fiscal_code.trim().to_uppercase())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<DriverStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Driver>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM drivers WHERE {}", DRIVER_FILTERS))
            .bind(search)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let drivers = sqlx::query_as::<_, Driver>(&format!(
            "SELECT * FROM drivers WHERE {} ORDER BY last_name ASC, first_name ASC, id ASC LIMIT $3 OFFSET $4",
            DRIVER_FILTERS
        ))
        .bind(search)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((drivers, total))
    }

    pub async fn create(&self, request: DriverRequest) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, first_name, last_name, fiscal_code, email, phone,
                                 license_number, license_category, license_expiry, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(clean_optional(request.fiscal_code).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.email).map(|v| v.to_lowercase()))
        .bind(clean_optional(request.phone))
        .bind(clean_optional(request.license_number).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.license_category).map(|v| v.to_uppercase()))
        .bind(request.license_expiry)
        .bind(request.status.unwrap_or(DriverStatus::Active))
        .bind(clean_optional(request.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn update(&self, id: Uuid, request: DriverRequest) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET first_name = $2, last_name = $3, fiscal_code = $4, email = $5, phone = $6,
                license_number = $7, license_category = $8, license_expiry = $9, status = $10,
                notes = $11, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(clean_optional(request.fiscal_code).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.email).map(|v| v.to_lowercase()))
        .bind(clean_optional(request.phone))
        .bind(clean_optional(request.license_number).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.license_category).map(|v| v.to_uppercase()))
        .bind(request.license_expiry)
        .bind(request.status.unwrap_or(DriverStatus::Active))
        .bind(clean_optional(request.notes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE drivers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
