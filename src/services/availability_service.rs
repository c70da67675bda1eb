//! Disponibilidad de recursos
//!
//! Dado un intervalo `[start, end)` calcula qué conductores y vehículos
//! están libres y, para los ocupados, qué actividades los bloquean.
//! También detecta conflictos al asignar recursos a una actividad.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dto::activity_dto::{ConflictRef, ResourceAssignment, ResourceAvailability};
use crate::models::activity::{intervals_overlap, ActivityStatus};

/// Asignación existente de un recurso a una actividad
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub activity_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

/// Recurso candidato (conductor o vehículo activo)
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Driver,
    Vehicle,
}

impl ResourceKind {
    fn resource_of(&self, booking: &Booking) -> Option<Uuid> {
        match self {
            ResourceKind::Driver => booking.driver_id,
            ResourceKind::Vehicle => booking.vehicle_id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Driver => "conductor",
            ResourceKind::Vehicle => "vehículo",
        }
    }
}

/// Ventana consultada, con la actividad que se está editando (si la hay)
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub exclude_activity_id: Option<Uuid>,
}

impl Window {
    fn blocks(&self, booking: &Booking) -> bool {
        booking.status.blocks_resources()
            && Some(booking.activity_id) != self.exclude_activity_id
            && intervals_overlap(booking.start_at, booking.end_at, self.start_at, self.end_at)
    }
}

/// Actividades que bloquean cada recurso del tipo indicado dentro de la ventana
fn blocking_by_resource<'a>(
    kind: ResourceKind,
    bookings: &'a [Booking],
    window: &Window,
) -> HashMap<Uuid, Vec<&'a Booking>> {
    let mut map: HashMap<Uuid, Vec<&Booking>> = HashMap::new();
    for booking in bookings.iter().filter(|b| window.blocks(b)) {
        if let Some(resource_id) = kind.resource_of(booking) {
            let entry = map.entry(resource_id).or_default();
            if !entry.iter().any(|b| b.activity_id == booking.activity_id) {
                entry.push(booking);
            }
        }
    }
    for list in map.values_mut() {
        list.sort_by_key(|b| (b.start_at, b.activity_id));
    }
    map
}

fn conflict_ref(booking: &Booking) -> ConflictRef {
    ConflictRef {
        activity_id: booking.activity_id,
        title: booking.title.clone(),
        start_at: booking.start_at,
        end_at: booking.end_at,
    }
}

/// Estado de disponibilidad de cada candidato, ordenado por etiqueta
pub fn compute_availability(
    kind: ResourceKind,
    candidates: &[Candidate],
    bookings: &[Booking],
    window: &Window,
) -> Vec<ResourceAvailability> {
    let blocking = blocking_by_resource(kind, bookings, window);

    let mut result: Vec<ResourceAvailability> = candidates
        .iter()
        .map(|candidate| {
            let conflicts: Vec<ConflictRef> = blocking
                .get(&candidate.id)
                .map(|list| list.iter().map(|b| conflict_ref(b)).collect())
                .unwrap_or_default();
            ResourceAvailability {
                id: candidate.id,
                label: candidate.label.clone(),
                available: conflicts.is_empty(),
                conflicts,
            }
        })
        .collect();

    result.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()).then(a.id.cmp(&b.id)));
    result
}

/// Conflicto de asignación detectado al guardar una actividad
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentConflict {
    pub kind: ResourceKind,
    pub resource_id: Uuid,
    pub activity: ConflictRef,
}

impl AssignmentConflict {
    /// Mensaje para la respuesta 409, con la etiqueta del recurso
    pub fn describe(&self, label: &str) -> String {
        format!(
            "El {} '{}' ya está asignado a '{}' ({} - {})",
            self.kind.as_str(),
            label,
            self.activity.title,
            self.activity.start_at.format("%d/%m/%Y %H:%M"),
            self.activity.end_at.format("%d/%m/%Y %H:%M"),
        )
    }
}

/// Buscar recursos de `assignments` ya ocupados en la ventana
pub fn find_assignment_conflicts(
    assignments: &[ResourceAssignment],
    bookings: &[Booking],
    window: &Window,
) -> Vec<AssignmentConflict> {
    let mut conflicts = Vec::new();

    for kind in [ResourceKind::Driver, ResourceKind::Vehicle] {
        let blocking = blocking_by_resource(kind, bookings, window);
        for assignment in assignments {
            let requested = match kind {
                ResourceKind::Driver => assignment.driver_id,
                ResourceKind::Vehicle => assignment.vehicle_id,
            };
            let Some(resource_id) = requested else { continue };
            if let Some(first) = blocking.get(&resource_id).and_then(|list| list.first()) {
                conflicts.push(AssignmentConflict {
                    kind,
                    resource_id,
                    activity: conflict_ref(first),
                });
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn booking(title: &str, start: u32, end: u32, driver: Option<Uuid>, vehicle: Option<Uuid>) -> Booking {
        Booking {
            activity_id: Uuid::new_v4(),
            title: title.to_string(),
            start_at: at(start),
            end_at: at(end),
            status: ActivityStatus::Planned,
            driver_id: driver,
            vehicle_id: vehicle,
        }
    }

    fn window(start: u32, end: u32) -> Window {
        Window {
            start_at: at(start),
            end_at: at(end),
            exclude_activity_id: None,
        }
    }

    #[test]
    fn test_busy_and_free_drivers() {
        let mario = Candidate { id: Uuid::new_v4(), label: "Mario Rossi".into() };
        let luca = Candidate { id: Uuid::new_v4(), label: "Luca Bianchi".into() };
        let bookings = vec![booking("Scavo", 8, 12, Some(mario.id), None)];

        let result = compute_availability(ResourceKind::Driver, &[mario.clone(), luca.clone()], &bookings, &window(10, 14));

        assert_eq!(result.len(), 2);
        // Ordenado por etiqueta
        assert_eq!(result[0].id, luca.id);
        assert!(result[0].available);
        assert_eq!(result[1].id, mario.id);
        assert!(!result[1].available);
        assert_eq!(result[1].conflicts[0].title, "Scavo");
    }

    #[test]
    fn test_touching_intervals_do_not_conflict() {
        let driver = Candidate { id: Uuid::new_v4(), label: "Anna Verdi".into() };
        let bookings = vec![booking("Mattina", 8, 12, Some(driver.id), None)];

        let result = compute_availability(ResourceKind::Driver, &[driver], &bookings, &window(12, 16));
        assert!(result[0].available);
    }

    #[test]
    fn test_cancelled_and_excluded_activities_do_not_block() {
        let vehicle = Candidate { id: Uuid::new_v4(), label: "AB123CD".into() };
        let mut cancelled = booking("Annullata", 8, 12, None, Some(vehicle.id));
        cancelled.status = ActivityStatus::Cancelled;
        let editing = booking("In modifica", 9, 11, None, Some(vehicle.id));

        let mut w = window(8, 12);
        w.exclude_activity_id = Some(editing.activity_id);

        let result = compute_availability(ResourceKind::Vehicle, &[vehicle], &[cancelled, editing], &w);
        assert!(result[0].available);
    }

    #[test]
    fn test_same_activity_listed_once_per_resource() {
        let vehicle = Candidate { id: Uuid::new_v4(), label: "AB123CD".into() };
        let first = booking("Trasporto", 8, 12, Some(Uuid::new_v4()), Some(vehicle.id));
        let mut second_row = first.clone();
        second_row.driver_id = Some(Uuid::new_v4());

        let result = compute_availability(ResourceKind::Vehicle, &[vehicle], &[first, second_row], &window(9, 10));
        assert_eq!(result[0].conflicts.len(), 1);
    }

    #[test]
    fn test_assignment_conflicts() {
        let driver = Uuid::new_v4();
        let vehicle = Uuid::new_v4();
        let free_vehicle = Uuid::new_v4();
        let bookings = vec![
            booking("Getto", 7, 10, Some(driver), None),
            booking("Consegna", 9, 13, None, Some(vehicle)),
        ];
        let assignments = vec![
            ResourceAssignment { driver_id: Some(driver), vehicle_id: Some(free_vehicle) },
            ResourceAssignment { driver_id: None, vehicle_id: Some(vehicle) },
        ];

        let conflicts = find_assignment_conflicts(&assignments, &bookings, &window(8, 12));
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].kind, ResourceKind::Driver);
        assert_eq!(conflicts[0].resource_id, driver);
        assert_eq!(conflicts[1].kind, ResourceKind::Vehicle);
        assert_eq!(conflicts[1].activity.title, "Consegna");
    }

    #[test]
    fn test_conflict_message_names_resource_and_activity() {
        let conflict = AssignmentConflict {
            kind: ResourceKind::Vehicle,
            resource_id: Uuid::new_v4(),
            activity: ConflictRef {
                activity_id: Uuid::new_v4(),
                title: "Consegna cantiere".into(),
                start_at: at(8),
                end_at: at(12),
            },
        };
        assert_eq!(
            conflict.describe("AB123CD"),
            "El vehículo 'AB123CD' ya está asignado a 'Consegna cantiere' (10/03/2025 08:00 - 10/03/2025 12:00)"
        );
    }
}
