use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleRequest;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;
use crate::utils::validation::{clean_optional, normalize_plate};

const VEHICLE_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR plate ILIKE $1 OR brand ILIKE $1 OR model ILIKE $1)
    AND ($2::vehicle_status IS NULL OR status = $2)
    AND ($3::text IS NULL OR vehicle_type ILIKE $3)
"#;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Vehículos vivos entre los ids indicados
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_active(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE status = 'active' AND deleted_at IS NULL ORDER BY plate ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn plate_exists(&self, plate: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE plate = $1 AND deleted_at IS NULL
                AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(normalize_plate(plate))
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<VehicleStatus>,
        vehicle_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vehicle>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM vehicles WHERE {}", VEHICLE_FILTERS))
            .bind(search)
            .bind(status)
            .bind(vehicle_type)
            .fetch_one(&self.pool)
            .await?;

        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT * FROM vehicles WHERE {} ORDER BY plate ASC, id ASC LIMIT $4 OFFSET $5",
            VEHICLE_FILTERS
        ))
        .bind(search)
        .bind(status)
        .bind(vehicle_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((vehicles, total))
    }

    pub async fn create(&self, request: VehicleRequest) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, plate, brand, model, vehicle_type, registration_year, mileage, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(normalize_plate(&request.plate))
        .bind(clean_optional(request.brand))
        .bind(clean_optional(request.model))
        .bind(clean_optional(request.vehicle_type))
        .bind(request.registration_year)
        .bind(request.mileage.unwrap_or(0))
        .bind(request.status.unwrap_or(VehicleStatus::Active))
        .bind(clean_optional(request.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, request: VehicleRequest) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET plate = $2, brand = $3, model = $4, vehicle_type = $5, registration_year = $6,
                mileage = $7, status = $8, notes = $9, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(normalize_plate(&request.plate))
        .bind(clean_optional(request.brand))
        .bind(clean_optional(request.model))
        .bind(clean_optional(request.vehicle_type))
        .bind(request.registration_year)
        .bind(request.mileage.unwrap_or(0))
        .bind(request.status.unwrap_or(VehicleStatus::Active))
        .bind(clean_optional(request.notes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE vehicles SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Sus vencimientos dejan de tener sentido
        sqlx::query(
            "UPDATE vehicle_deadlines SET deleted_at = NOW() WHERE vehicle_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
