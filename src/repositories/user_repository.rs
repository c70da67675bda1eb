use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, UserRole};
use crate::utils::errors::AppError;

const USER_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
    AND ($2::user_role IS NULL OR role = $2)
"#;

/// Datos a persistir de un usuario
pub struct UserData<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: UserRole,
    pub is_active: bool,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Comprobar si el email está en uso por otro usuario
    pub async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL
                AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email.trim())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM users WHERE {}", USER_FILTERS))
            .bind(search)
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT * FROM users WHERE {} ORDER BY name ASC, id ASC LIMIT $3 OFFSET $4",
            USER_FILTERS
        ))
        .bind(search)
        .bind(role)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }

    pub async fn create(&self, data: UserData<'_>, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name.trim())
        .bind(data.email.trim().to_lowercase())
        .bind(password_hash)
        .bind(data.role)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Actualizar usuario; `password_hash` None conserva la contraseña actual
    pub async fn update(
        &self,
        id: Uuid,
        data: UserData<'_>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, is_active = $5,
                password_hash = COALESCE($6, password_hash), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name.trim())
        .bind(data.email.trim().to_lowercase())
        .bind(data.role)
        .bind(data.is_active)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn record_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), is_active = FALSE WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
