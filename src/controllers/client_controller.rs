use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientFilters, ClientRequest, ClientResponse};
use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::search_pattern;
use crate::dto::site_dto::SiteResponse;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::site_repository::SiteRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct ClientController {
    repository: ClientRepository,
    sites: SiteRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool.clone()),
            sites: SiteRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: ClientFilters) -> Result<Paginated<ClientResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());
        let city = search_pattern(filters.city.as_deref());

        let (clients, total) = self
            .repository
            .list(search.as_deref(), city.as_deref(), page.limit(), page.offset())
            .await?;

        Ok(Paginated::new(clients, total, page).map(ClientResponse::from))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Cliente", id))?;

        Ok(ClientResponse::from(client))
    }

    pub async fn sites(&self, id: Uuid) -> Result<Vec<SiteResponse>, AppError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Cliente", id));
        }

        let sites = self.sites.find_by_client(id).await?;
        Ok(sites.into_iter().map(SiteResponse::from).collect())
    }

    async fn check_vat_number(&self, request: &ClientRequest, except: Option<Uuid>) -> Result<(), AppError> {
        if let Some(vat) = request.vat_number.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            if self.repository.vat_number_taken(vat, except).await? {
                return Err(conflict_error("Cliente", "partita IVA", vat));
            }
        }
        Ok(())
    }

    pub async fn create(&self, request: ClientRequest) -> Result<ApiResponse<ClientResponse>, AppError> {
        request.validate()?;
        self.check_vat_number(&request, None).await?;

        let client = self.repository.create(request).await?;

        info!("🏢 Cliente creado: {} ({})", client.name, client.id);
        Ok(ApiResponse::success_with_message(ClientResponse::from(client), "Cliente creado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: ClientRequest) -> Result<ApiResponse<ClientResponse>, AppError> {
        request.validate()?;
        self.check_vat_number(&request, Some(id)).await?;

        let client = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Cliente", id))?;

        info!("🏢 Cliente actualizado: {}", client.id);
        Ok(ApiResponse::success_with_message(ClientResponse::from(client), "Cliente actualizado exitosamente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Cliente", id));
        }

        let pending = self.repository.count_future_activities(id).await?;
        if pending > 0 {
            return Err(AppError::Conflict(format!(
                "El cliente tiene {} actividades pendientes y no puede eliminarse",
                pending
            )));
        }

        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Cliente", id));
        }

        info!("🗑️ Cliente eliminado: {}", id);
        Ok(ApiResponse::message("Cliente eliminado exitosamente"))
    }
}
