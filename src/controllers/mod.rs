//! Controladores
//!
//! Cada controlador valida la request, aplica las reglas de negocio sobre
//! los repositorios y devuelve los DTOs de respuesta.

pub mod activity_controller;
pub mod auth_controller;
pub mod calendar_controller;
pub mod client_controller;
pub mod dashboard_controller;
pub mod document_controller;
pub mod driver_controller;
pub mod note_controller;
pub mod site_controller;
pub mod user_controller;
pub mod vehicle_controller;
pub mod vehicle_deadline_controller;
