//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
            code: code.to_string(),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Códigos SQLSTATE de PostgreSQL que se traducen a errores de cliente
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_CHECK_VIOLATION: &str = "23514";

impl AppError {
    /// Código HTTP asociado al error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(e) => match database_error_code(e).as_deref() {
                Some(PG_UNIQUE_VIOLATION) => StatusCode::CONFLICT,
                Some(PG_FOREIGN_KEY_VIOLATION) | Some(PG_CHECK_VIOLATION) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Validation(_) | AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn database_error_code(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => match database_error_code(&e).as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    warn!("Unique violation: {}", e);
                    ErrorResponse::new("Conflict", "El registro ya existe", "CONFLICT")
                }
                Some(PG_FOREIGN_KEY_VIOLATION) | Some(PG_CHECK_VIOLATION) => {
                    warn!("Constraint violation: {}", e);
                    ErrorResponse::new(
                        "Unprocessable Entity",
                        "Los datos violan una restricción de integridad",
                        "CONSTRAINT_VIOLATION",
                    )
                }
                _ => {
                    error!("❌ Database error: {}", e);
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database",
                        "DB_ERROR",
                    )
                }
            },

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse::new("Validation Error", "The provided data is invalid", "VALIDATION_ERROR")
                    .with_details(json!(e))
            }

            AppError::Unprocessable(msg) => {
                warn!("Unprocessable entity: {}", msg);
                ErrorResponse::new("Validation Error", msg, "VALIDATION_ERROR")
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "JWT_ERROR")
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                ErrorResponse::new("Conflict", msg, "CONFLICT")
            }

            AppError::RateLimitExceeded => ErrorResponse::new(
                "Rate Limit Exceeded",
                "Too many requests. Please try again later",
                "RATE_LIMIT_EXCEEDED",
            ),

            AppError::Cache(msg) => {
                error!("❌ Cache error: {}", msg);
                ErrorResponse::new("Service Unavailable", "Note storage is unavailable", "CACHE_ERROR")
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                ErrorResponse::new("Internal Server Error", "An unexpected error occurred", "INTERNAL_ERROR")
            }

            AppError::Hash(msg) => {
                error!("❌ Hash error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An error occurred while processing credentials",
                    "HASH_ERROR",
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} con {} '{}' ya existe", resource, field, value))
}

/// Función helper para errores de integridad referencial detectados antes de escribir
pub fn unprocessable_error(message: impl Into<String>) -> AppError {
    AppError::Unprocessable(message.into())
}
