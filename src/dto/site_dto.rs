use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::site::Site;
use crate::utils::validation::{validate_not_blank, validate_postal_code, validate_province};

// Request para crear o reemplazar (PUT) una sede
#[derive(Debug, Deserialize, Validate)]
pub struct SiteRequest {
    pub client_id: Uuid,

    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 120))]
    pub city: Option<String>,

    #[validate(custom = "validate_province")]
    pub province: Option<String>,

    #[validate(custom = "validate_postal_code")]
    pub postal_code: Option<String>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SiteFilters {
    pub search: Option<String>,
    pub client_id: Option<Uuid>,
    pub active: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de sede
#[derive(Debug, Serialize)]
pub struct SiteResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Site> for SiteResponse {
    fn from(site: Site) -> Self {
        Self {
            id: site.id,
            client_id: site.client_id,
            name: site.name,
            address: site.address,
            city: site.city,
            province: site.province,
            postal_code: site.postal_code,
            notes: site.notes,
            is_active: site.is_active,
            created_at: site.created_at,
            updated_at: site.updated_at,
        }
    }
}
