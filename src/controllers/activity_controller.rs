use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::activity_dto::{
    check_resources, ActivityFilters, ActivityRequest, ActivityResponse, ActivityStatusRequest,
    AvailabilityQuery, AvailabilityResponse, ResourceAssignment,
};
use crate::dto::common::{ApiResponse, PageRequest, Paginated};
use crate::dto::search_pattern;
use crate::models::resolve_completed_at;
use crate::models::activity::ActivityStatus;
use crate::repositories::activity_repository::{ActivityQuery, ActivityRepository, ActivityWrite};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::site_repository::SiteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability_service::{
    compute_availability, find_assignment_conflicts, Booking, Candidate, ResourceKind, Window,
};
use crate::utils::errors::{not_found_error, unprocessable_error, AppError};

/// Etiquetas de los recursos de una actividad, para los mensajes de conflicto
type ResourceLabels = HashMap<Uuid, String>;

/// Guard que aborta la escritura si algún recurso ya está ocupado.
///
/// Se ejecuta dentro de la transacción, después del advisory lock.
fn conflict_guard<'a>(
    status: ActivityStatus,
    resources: &'a [ResourceAssignment],
    window: Window,
    labels: &'a ResourceLabels,
) -> impl FnOnce(Vec<Booking>) -> Result<(), AppError> + 'a {
    move |bookings| {
        if !status.blocks_resources() {
            return Ok(());
        }

        let conflicts = find_assignment_conflicts(resources, &bookings, &window);
        if conflicts.is_empty() {
            return Ok(());
        }

        let message = conflicts
            .iter()
            .map(|c| {
                let label = labels
                    .get(&c.resource_id)
                    .map(String::as_str)
                    .unwrap_or("desconocido");
                c.describe(label)
            })
            .collect::<Vec<_>>()
            .join("; ");
        warn!("⚠️ Conflicto de recursos: {}", message);
        Err(AppError::Conflict(message))
    }
}

pub struct ActivityController {
    repository: ActivityRepository,
    clients: ClientRepository,
    sites: SiteRepository,
    drivers: DriverRepository,
    vehicles: VehicleRepository,
}

impl ActivityController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ActivityRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            sites: SiteRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: ActivityFilters) -> Result<Paginated<ActivityResponse>, AppError> {
        let page = PageRequest::new(filters.page, filters.per_page);
        let search = search_pattern(filters.search.as_deref());
        let query = ActivityQuery {
            search: search.as_deref(),
            client_id: filters.client_id,
            site_id: filters.site_id,
            driver_id: filters.driver_id,
            vehicle_id: filters.vehicle_id,
            status: filters.status,
            from: filters.from,
            to: filters.to,
        };

        let (activities, total) = self.repository.list(&query, page.limit(), page.offset()).await?;
        let ids: Vec<Uuid> = activities.iter().map(|a| a.id).collect();
        let rows = self.repository.resources_for(&ids).await?;

        let mut result = Paginated::new(Vec::new(), total, page);
        result.data = ActivityResponse::assemble(activities, &rows);
        Ok(result)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ActivityResponse, AppError> {
        let activity = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Actividad", id))?;
        let rows = self.repository.resources_for(&[id]).await?;

        ActivityResponse::assemble(vec![activity], &rows)
            .pop()
            .ok_or_else(|| not_found_error("Actividad", id))
    }

    /// Comprobar cliente, sede y recursos; devuelve las etiquetas de los recursos
    async fn check_request(&self, request: &ActivityRequest) -> Result<ResourceLabels, AppError> {
        if self.clients.find_by_id(request.client_id).await?.is_none() {
            return Err(unprocessable_error(format!("El cliente '{}' no existe", request.client_id)));
        }

        if let Some(site_id) = request.site_id {
            let site = self
                .sites
                .find_by_id(site_id)
                .await?
                .ok_or_else(|| unprocessable_error(format!("La sede '{}' no existe", site_id)))?;
            if site.client_id != request.client_id {
                return Err(unprocessable_error("La sede no pertenece al cliente indicado"));
            }
        }

        let driver_ids: Vec<Uuid> = request.resources.iter().filter_map(|r| r.driver_id).collect();
        let vehicle_ids: Vec<Uuid> = request.resources.iter().filter_map(|r| r.vehicle_id).collect();

        let mut labels = ResourceLabels::new();
        for driver in self.drivers.find_many(&driver_ids).await? {
            labels.insert(driver.id, driver.full_name());
        }
        for vehicle in self.vehicles.find_many(&vehicle_ids).await? {
            labels.insert(vehicle.id, vehicle.label());
        }

        if let Some(missing) = driver_ids.iter().chain(&vehicle_ids).find(|id| !labels.contains_key(id)) {
            return Err(unprocessable_error(format!("El recurso '{}' no existe", missing)));
        }

        Ok(labels)
    }

    fn validate_request(request: &ActivityRequest) -> Result<(), AppError> {
        // Errores de recursos con código propio antes que el resto
        check_resources(&request.resources)
            .map_err(|e| unprocessable_error(format!("Recursos no válidos: {}", e.code)))?;
        request.validate()?;
        Ok(())
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        request: ActivityRequest,
    ) -> Result<ApiResponse<ActivityResponse>, AppError> {
        Self::validate_request(&request)?;
        let labels = self.check_request(&request).await?;

        let status = request.status.unwrap_or(ActivityStatus::Planned);
        let write = ActivityWrite {
            status,
            completed_at: resolve_completed_at(status.is_completed(), None, Utc::now()),
        };
        let window = Window {
            start_at: request.start_at,
            end_at: request.end_at,
            exclude_activity_id: None,
        };

        let id = self
            .repository
            .create(
                &request,
                write,
                Some(created_by),
                conflict_guard(status, &request.resources, window, &labels),
            )
            .await?;

        info!("🗓️ Actividad creada: {} ({})", request.title.trim(), id);
        let activity = self.get_by_id(id).await?;
        Ok(ApiResponse::success_with_message(activity, "Actividad creada exitosamente"))
    }

    pub async fn update(&self, id: Uuid, request: ActivityRequest) -> Result<ApiResponse<ActivityResponse>, AppError> {
        Self::validate_request(&request)?;

        let previous = self
            .repository
            .find_raw(id)
            .await?
            .ok_or_else(|| not_found_error("Actividad", id))?;
        let labels = self.check_request(&request).await?;

        let status = request.status.unwrap_or(previous.status);
        let write = ActivityWrite {
            status,
            completed_at: resolve_completed_at(status.is_completed(), previous.completed_at, Utc::now()),
        };
        let window = Window {
            start_at: request.start_at,
            end_at: request.end_at,
            exclude_activity_id: Some(id),
        };

        let updated = self
            .repository
            .update(id, &request, write, conflict_guard(status, &request.resources, window, &labels))
            .await?;
        if !updated {
            return Err(not_found_error("Actividad", id));
        }

        info!("🗓️ Actividad actualizada: {}", id);
        let activity = self.get_by_id(id).await?;
        Ok(ApiResponse::success_with_message(activity, "Actividad actualizada exitosamente"))
    }

    pub async fn change_status(
        &self,
        id: Uuid,
        request: ActivityStatusRequest,
    ) -> Result<ApiResponse<ActivityResponse>, AppError> {
        let current = self
            .repository
            .find_raw(id)
            .await?
            .ok_or_else(|| not_found_error("Actividad", id))?;

        // Recursos actuales de la actividad, con sus etiquetas
        let rows = self.repository.resources_for(&[id]).await?;
        let mut labels = ResourceLabels::new();
        let resources: Vec<ResourceAssignment> = rows
            .iter()
            .map(|row| {
                if let Some((driver_id, label)) = row.driver_id.zip(row.driver_label()) {
                    labels.insert(driver_id, label);
                }
                if let Some((vehicle_id, label)) = row.vehicle_id.zip(row.vehicle_label()) {
                    labels.insert(vehicle_id, label);
                }
                ResourceAssignment {
                    driver_id: row.driver_id,
                    vehicle_id: row.vehicle_id,
                }
            })
            .collect();

        let status = request.status;
        let write = ActivityWrite {
            status,
            completed_at: resolve_completed_at(status.is_completed(), current.completed_at, Utc::now()),
        };
        let window = Window {
            start_at: current.start_at,
            end_at: current.end_at,
            exclude_activity_id: Some(id),
        };

        // Sólo reactivar una actividad cancelada puede generar conflictos
        let guard_status = if current.status.blocks_resources() {
            ActivityStatus::Cancelled
        } else {
            status
        };

        let updated = self
            .repository
            .set_status(&current, write, conflict_guard(guard_status, &resources, window, &labels))
            .await?;
        if !updated {
            return Err(not_found_error("Actividad", id));
        }

        info!("🔄 Actividad {}: {:?} -> {:?}", id, current.status, status);
        let activity = self.get_by_id(id).await?;
        Ok(ApiResponse::success_with_message(activity, "Estado actualizado"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Actividad", id));
        }

        info!("🗑️ Actividad eliminada: {}", id);
        Ok(ApiResponse::message("Actividad eliminada exitosamente"))
    }

    /// Disponibilidad de conductores y vehículos activos en `[start_at, end_at)`
    pub async fn availability(&self, query: AvailabilityQuery) -> Result<AvailabilityResponse, AppError> {
        if query.end_at <= query.start_at {
            return Err(unprocessable_error("end_at debe ser posterior a start_at"));
        }

        let window = Window {
            start_at: query.start_at,
            end_at: query.end_at,
            exclude_activity_id: query.exclude_activity_id,
        };

        let drivers: Vec<Candidate> = self
            .drivers
            .find_active()
            .await?
            .into_iter()
            .map(|d| Candidate { label: d.full_name(), id: d.id })
            .collect();
        let vehicles: Vec<Candidate> = self
            .vehicles
            .find_active()
            .await?
            .into_iter()
            .map(|v| Candidate { label: v.label(), id: v.id })
            .collect();
        let bookings = self
            .repository
            .bookings(query.start_at, query.end_at, query.exclude_activity_id)
            .await?;

        Ok(AvailabilityResponse {
            start_at: query.start_at,
            end_at: query.end_at,
            drivers: compute_availability(ResourceKind::Driver, &drivers, &bookings, &window),
            vehicles: compute_availability(ResourceKind::Vehicle, &vehicles, &bookings, &window),
        })
    }
}
