use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::deadline_dto::{DeadlineFilters, DeadlineRequest, DeadlineResponse};
use crate::models::resolve_completed_at;
use crate::models::vehicle_deadline::DeadlineStatus;
use crate::repositories::vehicle_deadline_repository::{DeadlineQuery, VehicleDeadlineRepository};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, unprocessable_error, AppError};

pub struct VehicleDeadlineController {
    repository: VehicleDeadlineRepository,
    vehicles: VehicleRepository,
}

impl VehicleDeadlineController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleDeadlineRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: DeadlineFilters) -> Result<Paginated<DeadlineResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let today = Utc::now().date_naive();
        let query = DeadlineQuery {
            vehicle_id: filters.vehicle_id,
            status: filters.status,
            deadline_type: filters.deadline_type,
            due_before: filters.due_before,
            urgency: filters.urgency,
            today,
        };

        let (deadlines, total) = self.repository.list(&query, page.limit(), page.offset()).await?;

        Ok(Paginated::new(deadlines, total, page).map(|d| DeadlineResponse::from_model(d, today)))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DeadlineResponse, AppError> {
        let deadline = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vencimiento", id))?;

        Ok(DeadlineResponse::from_model(deadline, Utc::now().date_naive()))
    }

    async fn check_vehicle(&self, vehicle_id: Uuid) -> Result<(), AppError> {
        if self.vehicles.find_by_id(vehicle_id).await?.is_none() {
            return Err(unprocessable_error(format!("El vehículo '{}' no existe", vehicle_id)));
        }
        Ok(())
    }

    pub async fn create(&self, request: DeadlineRequest) -> Result<ApiResponse<DeadlineResponse>, AppError> {
        request.validate()?;
        self.check_vehicle(request.vehicle_id).await?;

        let now = Utc::now();
        let status = request.status.unwrap_or(DeadlineStatus::Pending);
        let completed_at = resolve_completed_at(status.is_completed(), None, now);

        let deadline = self.repository.create(request, status, completed_at).await?;

        info!(
            "📅 Vencimiento creado: {:?} {} para {}",
            deadline.deadline_type, deadline.due_date, deadline.vehicle_plate
        );
        Ok(ApiResponse::success_with_message(
            DeadlineResponse::from_model(deadline, now.date_naive()),
            "Vencimiento creado exitosamente",
        ))
    }

    pub async fn update(&self, id: Uuid, request: DeadlineRequest) -> Result<ApiResponse<DeadlineResponse>, AppError> {
        request.validate()?;

        let previous = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vencimiento", id))?;
        self.check_vehicle(request.vehicle_id).await?;

        let now = Utc::now();
        let status = request.status.unwrap_or(previous.status);
        let completed_at = resolve_completed_at(status.is_completed(), previous.completed_at, now);

        let deadline = self
            .repository
            .update(id, request, status, completed_at)
            .await?
            .ok_or_else(|| not_found_error("Vencimiento", id))?;

        info!("📅 Vencimiento actualizado: {}", deadline.id);
        Ok(ApiResponse::success_with_message(
            DeadlineResponse::from_model(deadline, now.date_naive()),
            "Vencimiento actualizado exitosamente",
        ))
    }

    /// Marcar como completado; repetir la llamada conserva la fecha original
    pub async fn complete(&self, id: Uuid) -> Result<ApiResponse<DeadlineResponse>, AppError> {
        let previous = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vencimiento", id))?;

        let now = Utc::now();
        let completed_at = resolve_completed_at(true, previous.completed_at, now);

        let deadline = self
            .repository
            .set_status(id, DeadlineStatus::Completed, completed_at)
            .await?
            .ok_or_else(|| not_found_error("Vencimiento", id))?;

        info!("✅ Vencimiento completado: {} ({})", deadline.id, deadline.vehicle_plate);
        Ok(ApiResponse::success_with_message(
            DeadlineResponse::from_model(deadline, now.date_naive()),
            "Vencimiento completado",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Vencimiento", id));
        }

        info!("🗑️ Vencimiento eliminado: {}", id);
        Ok(ApiResponse::message("Vencimiento eliminado exitosamente"))
    }
}
