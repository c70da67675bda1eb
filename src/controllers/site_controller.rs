use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::search_pattern;
use crate::dto::site_dto::{SiteFilters, SiteRequest, SiteResponse};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::site_repository::SiteRepository;
use crate::utils::errors::{not_found_error, unprocessable_error, AppError};

pub struct SiteController {
    repository: SiteRepository,
    clients: ClientRepository,
}

impl SiteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SiteRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: SiteFilters) -> Result<Paginated<SiteResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());

        let (sites, total) = self
            .repository
            .list(search.as_deref(), filters.client_id, filters.active, page.limit(), page.offset())
            .await?;

        Ok(Paginated::new(sites, total, page).map(SiteResponse::from))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<SiteResponse, AppError> {
        let site = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Sede", id))?;

        Ok(SiteResponse::from(site))
    }

    async fn check_client(&self, client_id: Uuid) -> Result<(), AppError> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(unprocessable_error(format!("El cliente '{}' no existe", client_id)));
        }
        Ok(())
    }

    pub async fn create(&self, request: SiteRequest) -> Result<ApiResponse<SiteResponse>, AppError> {
        request.validate()?;
        self.check_client(request.client_id).await?;

        let site = self.repository.create(request).await?;

        info!("📍 Sede creada: {} ({})", site.name, site.id);
        Ok(ApiResponse::success_with_message(SiteResponse::from(site), "Sede creada exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: SiteRequest) -> Result<ApiResponse<SiteResponse>, AppError> {
        request.validate()?;
        self.check_client(request.client_id).await?;

        let site = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Sede", id))?;

        info!("📍 Sede actualizada: {}", site.id);
        Ok(ApiResponse::success_with_message(SiteResponse::from(site), "Sede actualizada exitosamente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Sede", id));
        }

        info!("🗑️ Sede eliminada: {}", id);
        Ok(ApiResponse::message("Sede eliminada exitosamente"))
    }
}
