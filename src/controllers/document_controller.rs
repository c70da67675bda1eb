use chrono::{Days, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::document_dto::{DocumentFilters, DocumentRequest, DocumentResponse};
use crate::dto::search_pattern;
use crate::repositories::document_repository::{DocumentQuery, DocumentRepository};
use crate::utils::errors::{not_found_error, unprocessable_error, AppError};

pub struct DocumentController {
    repository: DocumentRepository,
}

impl DocumentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DocumentRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: DocumentFilters) -> Result<Paginated<DocumentResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());

        // `expiring_within` en días desde hoy
        let expiring_before = match filters.expiring_within {
            Some(days) if days < 0 => {
                return Err(unprocessable_error("expiring_within no puede ser negativo"));
            }
            Some(days) => Some(
                Utc::now()
                    .date_naive()
                    .checked_add_days(Days::new(days as u64))
                    .ok_or_else(|| unprocessable_error("expiring_within fuera de rango"))?,
            ),
            None => None,
        };

        let query = DocumentQuery {
            search: search.as_deref(),
            owner_type: filters.owner_type,
            owner_id: filters.owner_id,
            expiring_before,
        };
        let (documents, total) = self.repository.list(&query, page.limit(), page.offset()).await?;

        Ok(Paginated::new(documents, total, page).map(DocumentResponse::from))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DocumentResponse, AppError> {
        let document = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Documento", id))?;

        Ok(DocumentResponse::from(document))
    }

    async fn check_owner(&self, request: &DocumentRequest) -> Result<(), AppError> {
        if !self.repository.owner_exists(request.owner_type, request.owner_id).await? {
            return Err(unprocessable_error(format!(
                "El {} '{}' no existe",
                request.owner_type.as_str(),
                request.owner_id
            )));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        uploaded_by: Uuid,
        request: DocumentRequest,
    ) -> Result<ApiResponse<DocumentResponse>, AppError> {
        request.validate()?;
        self.check_owner(&request).await?;

        let document = self.repository.create(request, Some(uploaded_by)).await?;

        info!("📄 Documento registrado: {} ({})", document.title, document.id);
        Ok(ApiResponse::success_with_message(DocumentResponse::from(document), "Documento registrado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: DocumentRequest) -> Result<ApiResponse<DocumentResponse>, AppError> {
        request.validate()?;
        self.check_owner(&request).await?;

        let document = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Documento", id))?;

        info!("📄 Documento actualizado: {}", document.id);
        Ok(ApiResponse::success_with_message(DocumentResponse::from(document), "Documento actualizado exitosamente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Documento", id));
        }

        info!("🗑️ Documento eliminado: {}", id);
        Ok(ApiResponse::message("Documento eliminado exitosamente"))
    }
}
