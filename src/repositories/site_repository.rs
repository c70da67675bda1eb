use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::site_dto::SiteRequest;
use crate::models::site::Site;
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const SITE_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR name ILIKE $1 OR address ILIKE $1 OR city ILIKE $1)
    AND ($2::uuid IS NULL OR client_id = $2)
    AND ($3::boolean IS NULL OR is_active = $3)
"#;

pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>("SELECT * FROM sites WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(site)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        client_id: Option<Uuid>,
        active: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Site>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM sites WHERE {}", SITE_FILTERS))
            .bind(search)
            .bind(client_id)
            .bind(active)
            .fetch_one(&self.pool)
            .await?;

        let sites = sqlx::query_as::<_, Site>(&format!(
            "SELECT * FROM sites WHERE {} ORDER BY name ASC, id ASC LIMIT $4 OFFSET $5",
            SITE_FILTERS
        ))
        .bind(search)
        .bind(client_id)
        .bind(active)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((sites, total))
    }

    /// Todas las sedes vivas de un cliente, sin paginar
    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Site>, AppError> {
        let sites = sqlx::query_as::<_, Site>(
            "SELECT * FROM sites WHERE client_id = $1 AND deleted_at IS NULL ORDER BY name ASC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sites)
    }

    pub async fn create(&self, request: SiteRequest) -> Result<Site, AppError> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO sites (id, client_id, name, address, city, province, postal_code, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.client_id)
        .bind(request.name.trim())
        .bind(clean_optional(request.address))
        .bind(clean_optional(request.city))
        .bind(clean_optional(request.province).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.postal_code))
        .bind(clean_optional(request.notes))
        .bind(request.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(site)
    }

    pub async fn update(&self, id: Uuid, request: SiteRequest) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            UPDATE sites
            SET client_id = $2, name = $3, address = $4, city = $5, province = $6,
                postal_code = $7, notes = $8, is_active = $9, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.client_id)
        .bind(request.name.trim())
        .bind(clean_optional(request.address))
        .bind(clean_optional(request.city))
        .bind(clean_optional(request.province).map(|v| v.to_uppercase()))
        .bind(clean_optional(request.postal_code))
        .bind(clean_optional(request.notes))
        .bind(request.is_active.unwrap_or(true))
        .fetch_optional(&self.pool)
        .await?;

        Ok(site)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE sites SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
