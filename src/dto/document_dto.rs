use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::document::{Document, DocumentOwner};
use crate::utils::validation::validate_not_blank;

fn validate_document(request: &DocumentRequest) -> Result<(), ValidationError> {
    if let (Some(issued), Some(expires)) = (request.issued_on, request.expires_on) {
        if expires < issued {
            return Err(ValidationError::new("expires_before_issued"));
        }
    }
    Ok(())
}

// Request para registrar o reemplazar (PUT) un documento
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_document"))]
pub struct DocumentRequest {
    pub owner_type: DocumentOwner,

    pub owner_id: Uuid,

    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 500), custom = "validate_not_blank")]
    pub file_path: String,

    #[validate(length(max = 120))]
    pub mime_type: Option<String>,

    #[validate(range(min = 0))]
    pub file_size: Option<i64>,

    pub issued_on: Option<NaiveDate>,

    pub expires_on: Option<NaiveDate>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentFilters {
    pub search: Option<String>,
    pub owner_type: Option<DocumentOwner>,
    pub owner_id: Option<Uuid>,
    pub expiring_within: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de documento
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
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
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            owner_type: document.owner_type,
            owner_id: document.owner_id,
            title: document.title,
            category: document.category,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
            issued_on: document.issued_on,
            expires_on: document.expires_on,
            notes: document.notes,
            uploaded_by: document.uploaded_by,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_before_issue_is_rejected() {
        let request = DocumentRequest {
            owner_type: DocumentOwner::Vehicle,
            owner_id: Uuid::new_v4(),
            title: "Libretto".into(),
            category: None,
            file_path: "vehicles/libretto.pdf".into(),
            mime_type: Some("application/pdf".into()),
            file_size: Some(1024),
            issued_on: NaiveDate::from_ymd_opt(2025, 5, 1),
            expires_on: NaiveDate::from_ymd_opt(2025, 4, 1),
            notes: None,
        };
        assert!(request.validate().is_err());
    }
}
