use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::activity_dto::{ActivityRequest, ResourceAssignment};
use crate::models::activity::{Activity, ActivityResourceRow, ActivityStatus, ActivityWithNames};
use crate::services::availability_service::Booking;
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const ACTIVITY_COLUMNS: &str = r#"
    a.id, a.client_id, c.name AS client_name, a.site_id, s.name AS site_name,
    a.title, a.description, a.start_at, a.end_at, a.status, a.completed_at,
    a.notes, a.created_by, a.created_at, a.updated_at
"#;

const ACTIVITY_FROM: &str = r#"
    activities a
    JOIN clients c ON c.id = a.client_id
    LEFT JOIN sites s ON s.id = a.site_id
"#;

const ACTIVITY_FILTERS: &str = r#"
    a.deleted_at IS NULL
    AND ($1::text IS NULL OR a.title ILIKE $1 OR a.description ILIKE $1 OR c.name ILIKE $1)
    AND ($2::uuid IS NULL OR a.client_id = $2)
    AND ($3::uuid IS NULL OR a.site_id = $3)
    AND ($4::uuid IS NULL OR EXISTS (
        SELECT 1 FROM activity_resources r WHERE r.activity_id = a.id AND r.driver_id = $4))
    AND ($5::uuid IS NULL OR EXISTS (
        SELECT 1 FROM activity_resources r WHERE r.activity_id = a.id AND r.vehicle_id = $5))
    AND ($6::activity_status IS NULL OR a.status = $6)
    AND ($7::timestamptz IS NULL OR a.end_at > $7)
    AND ($8::timestamptz IS NULL OR a.start_at < $8)
"#;

// Advisory lock que serializa las escrituras de asignaciones: la
// comprobación de conflictos y el INSERT ven el mismo estado
const RESOURCE_LOCK_KEY: i64 = 7_310_421;

/// Filtros ya resueltos del listado de actividades
pub struct ActivityQuery<'a> {
    pub search: Option<&'a str>,
    pub client_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: Option<ActivityStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Valores derivados que el controlador calcula antes de guardar
pub struct ActivityWrite {
    pub status: ActivityStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ActivityWithNames>, AppError> {
        let activity = sqlx::query_as::<_, ActivityWithNames>(&format!(
            "SELECT {} FROM {} WHERE a.id = $1 AND a.deleted_at IS NULL",
            ACTIVITY_COLUMNS, ACTIVITY_FROM
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(activity)
    }

    /// Fila cruda de la tabla, para conocer el estado previo
    pub async fn find_raw(&self, id: Uuid) -> Result<Option<Activity>, AppError> {
        let activity = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(activity)
    }

    pub async fn list(
        &self,
        query: &ActivityQuery<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ActivityWithNames>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            ACTIVITY_FROM, ACTIVITY_FILTERS
        ))
        .bind(query.search)
        .bind(query.client_id)
        .bind(query.site_id)
        .bind(query.driver_id)
        .bind(query.vehicle_id)
        .bind(query.status)
        .bind(query.from)
        .bind(query.to)
        .fetch_one(&self.pool)
        .await?;

        let activities = sqlx::query_as::<_, ActivityWithNames>(&format!(
            r#"
            SELECT {} FROM {} WHERE {}
            ORDER BY a.start_at DESC, a.id ASC
            LIMIT $9 OFFSET $10
            "#,
            ACTIVITY_COLUMNS, ACTIVITY_FROM, ACTIVITY_FILTERS
        ))
        .bind(query.search)
        .bind(query.client_id)
        .bind(query.site_id)
        .bind(query.driver_id)
        .bind(query.vehicle_id)
        .bind(query.status)
        .bind(query.from)
        .bind(query.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((activities, total))
    }

    /// Actividades vivas que se solapan con `[from, to)`, para el calendario
    pub async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        include_cancelled: bool,
    ) -> Result<Vec<ActivityWithNames>, AppError> {
        let activities = sqlx::query_as::<_, ActivityWithNames>(&format!(
            r#"
            SELECT {} FROM {}
            WHERE a.deleted_at IS NULL
            AND a.start_at < $2 AND $1 < a.end_at
            AND ($3 OR a.status <> 'cancelled')
            ORDER BY a.start_at ASC, a.id ASC
            "#,
            ACTIVITY_COLUMNS, ACTIVITY_FROM
        ))
        .bind(from)
        .bind(to)
        .bind(include_cancelled)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    /// Recursos con etiquetas de las actividades indicadas
    pub async fn resources_for(&self, activity_ids: &[Uuid]) -> Result<Vec<ActivityResourceRow>, AppError> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ActivityResourceRow>(
            r#"
            SELECT r.id, r.activity_id,
                   r.driver_id, d.first_name AS driver_first_name, d.last_name AS driver_last_name,
                   r.vehicle_id, v.plate AS vehicle_plate, v.brand AS vehicle_brand, v.model AS vehicle_model
            FROM activity_resources r
            LEFT JOIN drivers d ON d.id = r.driver_id
            LEFT JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.activity_id = ANY($1)
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(activity_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Asignaciones de actividades no canceladas que se solapan con `[start, end)`
    pub async fn bookings(
        &self,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_activity_id: Option<Uuid>,
    ) -> Result<Vec<Booking>, AppError> {
        load_bookings(&self.pool, start_at, end_at, exclude_activity_id).await
    }

    /// Crear actividad y sus recursos en una transacción.
    ///
    /// `guard` recibe las asignaciones en conflicto potencial leídas dentro
    /// de la transacción y puede abortar la escritura.
    pub async fn create<G>(
        &self,
        request: &ActivityRequest,
        write: ActivityWrite,
        created_by: Option<Uuid>,
        guard: G,
    ) -> Result<Uuid, AppError>
    where
        G: FnOnce(Vec<Booking>) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;
        lock_resources(&mut tx).await?;

        let bookings = load_bookings(&mut *tx, request.start_at, request.end_at, None).await?;
        guard(bookings)?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO activities (id, client_id, site_id, title, description, start_at, end_at,
                                    status, completed_at, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(request.client_id)
        .bind(request.site_id)
        .bind(request.title.trim())
        .bind(clean_optional(request.description.clone()))
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(write.status)
        .bind(write.completed_at)
        .bind(clean_optional(request.notes.clone()))
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        insert_resources(&mut tx, id, &request.resources).await?;

        tx.commit().await?;

        Ok(id)
    }

    /// Reemplazar actividad y recursos (PUT); `false` si no existe
    pub async fn update<G>(
        &self,
        id: Uuid,
        request: &ActivityRequest,
        write: ActivityWrite,
        guard: G,
    ) -> Result<bool, AppError>
    where
        G: FnOnce(Vec<Booking>) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;
        lock_resources(&mut tx).await?;

        let bookings = load_bookings(&mut *tx, request.start_at, request.end_at, Some(id)).await?;
        guard(bookings)?;

        let result = sqlx::query(
            r#"
            UPDATE activities
            SET client_id = $2, site_id = $3, title = $4, description = $5, start_at = $6,
                end_at = $7, status = $8, completed_at = $9, notes = $10, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(request.client_id)
        .bind(request.site_id)
        .bind(request.title.trim())
        .bind(clean_optional(request.description.clone()))
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(write.status)
        .bind(write.completed_at)
        .bind(clean_optional(request.notes.clone()))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM activity_resources WHERE activity_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_resources(&mut tx, id, &request.resources).await?;

        tx.commit().await?;

        Ok(true)
    }

    /// Cambiar sólo el estado. Volver a un estado activo puede chocar con
    /// otras asignaciones, por eso también pasa por `guard`.
    pub async fn set_status<G>(
        &self,
        current: &Activity,
        write: ActivityWrite,
        guard: G,
    ) -> Result<bool, AppError>
    where
        G: FnOnce(Vec<Booking>) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;
        lock_resources(&mut tx).await?;

        let bookings = load_bookings(&mut *tx, current.start_at, current.end_at, Some(current.id)).await?;
        guard(bookings)?;

        let result = sqlx::query(
            r#"
            UPDATE activities SET status = $2, completed_at = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(current.id)
        .bind(write.status)
        .bind(write.completed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE activities SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn lock_resources(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(RESOURCE_LOCK_KEY)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn load_bookings<'e, E>(
    executor: E,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    exclude_activity_id: Option<Uuid>,
) -> Result<Vec<Booking>, AppError>
where
    E: PgExecutor<'e>,
{
    let bookings = sqlx::query_as::<_, Booking>(
        r#"
        SELECT a.id AS activity_id, a.title, a.start_at, a.end_at, a.status,
               r.driver_id, r.vehicle_id
        FROM activity_resources r
        JOIN activities a ON a.id = r.activity_id
        WHERE a.deleted_at IS NULL
        AND a.status <> 'cancelled'
        AND a.start_at < $2 AND $1 < a.end_at
        AND ($3::uuid IS NULL OR a.id <> $3)
        "#,
    )
    .bind(start_at)
    .bind(end_at)
    .bind(exclude_activity_id)
    .fetch_all(executor)
    .await?;

    Ok(bookings)
}

async fn insert_resources(
    tx: &mut Transaction<'_, Postgres>,
    activity_id: Uuid,
    resources: &[ResourceAssignment],
) -> Result<(), AppError> {
    for resource in resources {
        sqlx::query(
            "INSERT INTO activity_resources (id, activity_id, driver_id, vehicle_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(activity_id)
        .bind(resource.driver_id)
        .bind(resource.vehicle_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
