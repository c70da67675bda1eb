//! DTOs de la API
//!
//! Requests (con validación `validator`) y responses serializadas en JSON.

pub mod activity_dto;
pub mod auth_dto;
pub mod calendar_dto;
pub mod client_dto;
pub mod common;
pub mod dashboard_dto;
pub mod deadline_dto;
pub mod document_dto;
pub mod driver_dto;
pub mod note_dto;
pub mod site_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use common::*;
