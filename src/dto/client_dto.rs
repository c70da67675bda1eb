use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::client::Client;
use crate::utils::validation::{
    validate_not_blank, validate_phone, validate_postal_code, validate_province, validate_vat_number,
};

// Request para crear o reemplazar (PUT) un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,

    #[validate(custom = "validate_vat_number")]
    pub vat_number: Option<String>,

    #[validate(length(min = 11, max = 16))]
    pub fiscal_code: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

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
}

#[derive(Debug, Deserialize)]
pub struct ClientFilters {
    pub search: Option<String>,
    pub city: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de cliente
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub vat_number: Option<String>,
    pub fiscal_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            vat_number: client.vat_number,
            fiscal_code: client.fiscal_code,
            email: client.email,
            phone: client.phone,
            address: client.address,
            city: client.city,
            province: client.province,
            postal_code: client.postal_code,
            notes: client.notes,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
