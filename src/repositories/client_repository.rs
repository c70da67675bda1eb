use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::client_dto::ClientRequest;
use crate::models::client::Client;
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const CLIENT_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR name ILIKE $1 OR vat_number ILIKE $1 OR fiscal_code ILIKE $1 OR email ILIKE $1)
    AND ($2::text IS NULL OR city ILIKE $2)
"#;

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn vat_number_taken(&self, vat_number: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM clients
                WHERE vat_number = $1 AND deleted_at IS NULL
                AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(vat_number.trim())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        city: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Client>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM clients WHERE {}", CLIENT_FILTERS))
            .bind(search)
            .bind(city)
            .fetch_one(&self.pool)
            .await?;

        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT * FROM clients WHERE {} ORDER BY name ASC, id ASC LIMIT $3 OFFSET $4",
            CLIENT_FILTERS
        ))
        .bind(search)
        .bind(city)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((clients, total))
    }

    pub async fn create(&self, request: ClientRequest) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, name, vat_number, fiscal_code, email, phone, address, city, province, postal_code, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(clean_optional(request.vat_number))
        .bind(clean_optional(request.fiscal_code).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.email).map(|v| v.to_lowercase()))
        .bind(clean_optional(request.phone))
        .bind(clean_optional(request.address))
        .bind(clean_optional(request.city))
        .bind(clean_optional(request.province).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.postal_code))
        .bind(clean_optional(request.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn update(&self, id: Uuid, request: ClientRequest) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $2, vat_number = $3, fiscal_code = $4, email = $5, phone = $6,
                address = $7, city = $8, province = $9, postal_code = $10, notes = $11,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.trim())
        .bind(clean_optional(request.vat_number))
        .bind(clean_optional(request.fiscal_code).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.email).map(|v| v.to_lowercase()))
        .bind(clean_optional(request.phone))
        .bind(clean_optional(request.address))
        .bind(clean_optional(request.city))
        .bind(clean_optional(request.province).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.postal_code))
        .bind(clean_optional(request.notes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Actividades vivas del cliente que aún no han terminado
    pub async fn count_future_activities(&self, id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM activities
            WHERE client_id = $1 AND deleted_at IS NULL
            AND status <> 'cancelled' AND end_at > NOW()
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE clients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Las sedes del cliente se dan de baja con él
        sqlx::query("UPDATE sites SET deleted_at = NOW() WHERE client_id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
