//! Modelo de Document
//!
//! Documentos adjuntos a cualquier entidad del back office (relación
//! polimórfica `owner_type` + `owner_id`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de propietario - mapea al ENUM document_owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "document_owner", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentOwner {
    Client,
    Site,
    Driver,
    Vehicle,
    Activity,
}

impl DocumentOwner {
    /// Tabla que contiene al propietario
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentOwner::Client => "cliente",
            DocumentOwner::Site => "sede",
            DocumentOwner::Driver => "conductor",
            DocumentOwner::Vehicle => "vehículo",
            DocumentOwner::Activity => "actividad",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            DocumentOwner::Client => "clients",
            DocumentOwner::Site => "sites",
            DocumentOwner::Driver => "drivers",
            DocumentOwner::Vehicle => "vehicles",
            DocumentOwner::Activity => "activities",
        }
    }
}

/// Document - mapea a la tabla documents
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub owner_type: DocumentOwner,
    pub owner_id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
    pub issued_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
