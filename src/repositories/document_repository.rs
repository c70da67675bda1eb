use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::document_dto::DocumentRequest;
use crate::models::document::{Document, DocumentOwner};
use crate::utils::errors::AppError;
use crate::utils::validation::clean_optional;

const DOCUMENT_FILTERS: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR title ILIKE $1 OR category ILIKE $1)
    AND ($2::document_owner IS NULL OR owner_type = $2)
    AND ($3::uuid IS NULL OR owner_id = $3)
    AND ($4::date IS NULL OR (expires_on IS NOT NULL AND expires_on <= $4))
"#;

/// Filtros ya resueltos del listado de documentos
pub struct DocumentQuery<'a> {
    pub search: Option<&'a str>,
    pub owner_type: Option<DocumentOwner>,
    pub owner_id: Option<Uuid>,
    pub expiring_before: Option<NaiveDate>,
}

pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(document)
    }

    /// Comprobar que el propietario existe y no está dado de baja
    pub async fn owner_exists(&self, owner_type: DocumentOwner, owner_id: Uuid) -> Result<bool, AppError> {
        // El nombre de tabla sale de un enum cerrado, no de la entrada del usuario
        let (exists,): (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND deleted_at IS NULL)",
            owner_type.table()
        ))
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list(
        &self,
        query: &DocumentQuery<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Document>, i64), AppError> {
        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM documents WHERE {}", DOCUMENT_FILTERS))
            .bind(query.search)
            .bind(query.owner_type)
            .bind(query.owner_id)
            .bind(query.expiring_before)
            .fetch_one(&self.pool)
            .await?;

        let documents = sqlx::query_as::<_, Document>(&format!(
            r#"
            SELECT * FROM documents WHERE {}
            ORDER BY expires_on ASC NULLS LAST, created_at DESC, id ASC
            LIMIT $5 OFFSET $6
            "#,
            DOCUMENT_FILTERS
        ))
        .bind(query.search)
        .bind(query.owner_type)
        .bind(query.owner_id)
        .bind(query.expiring_before)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((documents, total))
    }

    pub async fn create(&self, request: DocumentRequest, uploaded_by: Option<Uuid>) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, owner_type, owner_id, title, category, file_path, mime_type,
                                   file_size, issued_on, expires_on, notes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.owner_type)
        .bind(request.owner_id)
        .bind(request.title.trim())
        .bind(clean_optional(request.category))
        .bind(request.file_path.trim())
        .bind(clean_optional(request.mime_type))
        .bind(request.file_size.unwrap_or(0))
        .bind(request.issued_on)
        .bind(request.expires_on)
        .bind(clean_optional(request.notes))
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn update(&self, id: Uuid, request: DocumentRequest) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET owner_type = $2, owner_id = $3, title = $4, category = $5, file_path = $6,
                mime_type = $7, file_size = $8, issued_on = $9, expires_on = $10, notes = $11,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.owner_type)
        .bind(request.owner_id)
        .bind(request.title.trim())
        .bind(clean_optional(request.category))
        .bind(request.file_path.trim())
        .bind(clean_optional(request.mime_type))
        .bind(request.file_size.unwrap_or(0))
        .bind(request.issued_on)
        .bind(request.expires_on)
        .bind(clean_optional(request.notes))
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE documents SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
