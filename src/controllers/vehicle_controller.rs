use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::deadline_dto::DeadlineResponse;
use crate::dto::search_pattern;
use crate::dto::vehicle_dto::{VehicleFilters, VehicleRequest, VehicleResponse};
use crate::repositories::vehicle_deadline_repository::VehicleDeadlineRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, unprocessable_error, AppError};
use crate::utils::validation::normalize_plate;

pub struct VehicleController {
    repository: VehicleRepository,
    deadlines: VehicleDeadlineRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            deadlines: VehicleDeadlineRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Paginated<VehicleResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());
        let vehicle_type = filters
            .vehicle_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let (vehicles, total) = self
            .repository
            .list(search.as_deref(), filters.status, vehicle_type, page.limit(), page.offset())
            .await?;

        Ok(Paginated::new(vehicles, total, page).map(VehicleResponse::from))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", id))?;

        Ok(VehicleResponse::from(vehicle))
    }

    /// Vencimientos de un vehículo, ordenados por fecha
    pub async fn deadlines(&self, id: Uuid) -> Result<Vec<DeadlineResponse>, AppError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Vehículo", id));
        }

        let today = Utc::now().date_naive();
        let deadlines = self.deadlines.find_by_vehicle(id).await?;
        Ok(deadlines
            .into_iter()
            .map(|d| DeadlineResponse::from_model(d, today))
            .collect())
    }

    async fn check_request(&self, request: &VehicleRequest, except: Option<Uuid>) -> Result<(), AppError> {
        // El año de matriculación admite como mucho el año próximo
        let max_year = Utc::now().year() + 1;
        if let Some(year) = request.registration_year {
            if year > max_year {
                return Err(unprocessable_error(format!(
                    "El año de matriculación {} es posterior a {}",
                    year, max_year
                )));
            }
        }

        if self.repository.plate_exists(&request.plate, except).await? {
            return Err(conflict_error("Vehículo", "matrícula", &normalize_plate(&request.plate)));
        }
        Ok(())
    }

    pub async fn create(&self, request: VehicleRequest) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;
        self.check_request(&request, None).await?;

        let vehicle = self.repository.create(request).await?;

        info!("🚚 Vehículo creado: {} ({})", vehicle.plate, vehicle.id);
        Ok(ApiResponse::success_with_message(VehicleResponse::from(vehicle), "Vehículo creado exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: VehicleRequest) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;
        self.check_request(&request, Some(id)).await?;

        let vehicle = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", id))?;

        info!("🚚 Vehículo actualizado: {}", vehicle.plate);
        Ok(ApiResponse::success_with_message(VehicleResponse::from(vehicle), "Vehículo actualizado exitosamente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Vehículo", id));
        }

        info!("🗑️ Vehículo eliminado: {}", id);
        Ok(ApiResponse::message("Vehículo eliminado exitosamente"))
    }
}
