use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::activity::{ActivityResourceRow, ActivityStatus, ActivityWithNames};
use crate::utils::validation::validate_not_blank;

/// Recurso asignado a una actividad: un conductor, un vehículo o ambos
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResourceAssignment {
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

fn validate_activity(request: &ActivityRequest) -> Result<(), ValidationError> {
    if request.end_at <= request.start_at {
        return Err(ValidationError::new("end_before_start"));
    }
    check_resources(&request.resources)
}

/// Cada asignación necesita al menos un recurso y ninguno puede repetirse
pub fn check_resources(resources: &[ResourceAssignment]) -> Result<(), ValidationError> {
    let mut drivers = HashSet::new();
    let mut vehicles = HashSet::new();
    for resource in resources {
        if resource.driver_id.is_none() && resource.vehicle_id.is_none() {
            return Err(ValidationError::new("empty_resource"));
        }
        if let Some(driver_id) = resource.driver_id {
            if !drivers.insert(driver_id) {
                return Err(ValidationError::new("duplicate_driver"));
            }
        }
        if let Some(vehicle_id) = resource.vehicle_id {
            if !vehicles.insert(vehicle_id) {
                return Err(ValidationError::new("duplicate_vehicle"));
            }
        }
    }
    Ok(())
}

// Request para crear o reemplazar (PUT) una actividad
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_activity"))]
pub struct ActivityRequest {
    pub client_id: Uuid,

    pub site_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    pub start_at: DateTime<Utc>,

    pub end_at: DateTime<Utc>,

    pub status: Option<ActivityStatus>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub resources: Vec<ResourceAssignment>,
}

// Request para cambiar sólo el estado
#[derive(Debug, Deserialize)]
pub struct ActivityStatusRequest {
    pub status: ActivityStatus,
}

#[derive(Debug, Deserialize)]
pub struct ActivityFilters {
    pub search: Option<String>,
    pub client_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: Option<ActivityStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Referencia con etiqueta legible
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityRef {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityResourceResponse {
    pub id: Uuid,
    pub driver: Option<EntityRef>,
    pub vehicle: Option<EntityRef>,
}

// Response de actividad
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub client: EntityRef,
    pub site: Option<EntityRef>,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ActivityStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub resources: Vec<ActivityResourceResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivityResourceResponse {
    fn from_row(row: &ActivityResourceRow) -> Self {
        Self {
            id: row.id,
            driver: row
                .driver_id
                .zip(row.driver_label())
                .map(|(id, label)| EntityRef { id, label }),
            vehicle: row
                .vehicle_id
                .zip(row.vehicle_label())
                .map(|(id, label)| EntityRef { id, label }),
        }
    }
}

impl ActivityResponse {
    pub fn from_parts(activity: ActivityWithNames, resources: Vec<ActivityResourceResponse>) -> Self {
        Self {
            id: activity.id,
            client: EntityRef {
                id: activity.client_id,
                label: activity.client_name,
            },
            site: activity
                .site_id
                .zip(activity.site_name)
                .map(|(id, label)| EntityRef { id, label }),
            title: activity.title,
            description: activity.description,
            start_at: activity.start_at,
            end_at: activity.end_at,
            status: activity.status,
            completed_at: activity.completed_at,
            notes: activity.notes,
            resources,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }

    /// Montar las responses repartiendo los recursos por actividad
    pub fn assemble(activities: Vec<ActivityWithNames>, rows: &[ActivityResourceRow]) -> Vec<Self> {
        let mut by_activity: HashMap<Uuid, Vec<ActivityResourceResponse>> = HashMap::new();
        for row in rows {
            by_activity
                .entry(row.activity_id)
                .or_default()
                .push(ActivityResourceResponse::from_row(row));
        }

        activities
            .into_iter()
            .map(|activity| {
                let resources = by_activity.remove(&activity.id).unwrap_or_default();
                Self::from_parts(activity, resources)
            })
            .collect()
    }
}

// Consulta de disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub exclude_activity_id: Option<Uuid>,
}

/// Actividad que ocupa un recurso en la ventana consultada
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConflictRef {
    pub activity_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceAvailability {
    pub id: Uuid,
    pub label: String,
    pub available: bool,
    pub conflicts: Vec<ConflictRef>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub drivers: Vec<ResourceAvailability>,
    pub vehicles: Vec<ResourceAvailability>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(resources: Vec<ResourceAssignment>) -> ActivityRequest {
        let start_at = Utc::now();
        ActivityRequest {
            client_id: Uuid::new_v4(),
            site_id: None,
            title: "Scavo fondazioni".into(),
            description: None,
            start_at,
            end_at: start_at + Duration::hours(4),
            status: None,
            notes: None,
            resources,
        }
    }

    #[test]
    fn test_valid_activity() {
        let driver = Uuid::new_v4();
        let vehicle = Uuid::new_v4();
        let req = request(vec![
            ResourceAssignment { driver_id: Some(driver), vehicle_id: Some(vehicle) },
            ResourceAssignment { driver_id: None, vehicle_id: Some(Uuid::new_v4()) },
        ]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut req = request(vec![]);
        req.end_at = req.start_at;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut req = request(vec![]);
        req.title = "   ".into();
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));
    }

    #[test]
    fn test_resource_rules() {
        let driver = Uuid::new_v4();
        assert_eq!(
            check_resources(&[ResourceAssignment { driver_id: None, vehicle_id: None }]).unwrap_err().code,
            "empty_resource"
        );
        assert_eq!(
            check_resources(&[
                ResourceAssignment { driver_id: Some(driver), vehicle_id: None },
                ResourceAssignment { driver_id: Some(driver), vehicle_id: Some(Uuid::new_v4()) },
            ])
            .unwrap_err()
            .code,
            "duplicate_driver"
        );
    }

    fn with_names(id: Uuid) -> ActivityWithNames {
        let now = Utc::now();
        ActivityWithNames {
            id,
            client_id: Uuid::new_v4(),
            client_name: "Edilnord Srl".into(),
            site_id: None,
            site_name: None,
            title: "Trasporto inerti".into(),
            description: None,
            start_at: now,
            end_at: now + Duration::hours(2),
            status: ActivityStatus::Planned,
            completed_at: None,
            notes: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_groups_resources_by_activity() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let rows = vec![ActivityResourceRow {
            id: Uuid::new_v4(),
            activity_id: first,
            driver_id: Some(driver),
            driver_first_name: Some("Mario".into()),
            driver_last_name: Some("Rossi".into()),
            vehicle_id: None,
            vehicle_plate: None,
            vehicle_brand: None,
            vehicle_model: None,
        }];

        let responses = ActivityResponse::assemble(vec![with_names(first), with_names(second)], &rows);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].client.label, "Edilnord Srl");
        assert_eq!(
            responses[0].resources[0].driver,
            Some(EntityRef { id: driver, label: "Mario Rossi".into() })
        );
        assert!(responses[0].resources[0].vehicle.is_none());
        assert!(responses[1].resources.is_empty());
    }
}
