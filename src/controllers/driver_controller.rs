use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::driver_dto::{DriverFilters, DriverRequest, DriverResponse};
use crate::dto::search_pattern;
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: DriverFilters) -> Result<Paginated<DriverResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());

        let (drivers, total) = self
            .repository
            .list(search.as_deref(), filters.status, page.limit(), page.offset())
            .await?;

        Ok(Paginated::new(drivers, total, page).map(DriverResponse::from))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DriverResponse, AppError> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Conductor", id))?;

        Ok(DriverResponse::from(driver))
    }

    async fn check_fiscal_code(&self, request: &DriverRequest, except: Option<Uuid>) -> Result<(), AppError> {
        if let Some(code) = request.fiscal_code.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            if self.repository.fiscal_code_taken(code, except).await? {
                return Err(conflict_error("Conductor", "codice fiscale", &code.to_uppercase()));
            }
        }
        Ok(())
    }

    pub async fn create(&self, request: DriverRequest) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;
        self.check_fiscal_code(&request, None).await?;

        let driver = self.repository.create(request).await?;

        info!("🧑‍✈️ Conductor creado: {} ({})", driver.full_name(), driver.id);
        Ok(ApiResponse::success_with_message(DriverResponse::from(driver), "Conductor creado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: DriverRequest) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;
        self.check_fiscal_code(&request, Some(id)).await?;

        let driver = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Conductor", id))?;

        info!("🧑‍✈️ Conductor actualizado: {}", driver.id);
        Ok(ApiResponse::success_with_message(DriverResponse::from(driver), "Conductor actualizado exitosamente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Conductor", id));
        }

        info!("🗑️ Conductor eliminado: {}", id);
        Ok(ApiResponse::message("Conductor eliminado exitosamente"))
    }
}
