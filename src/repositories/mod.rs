//! Repositorios
//!
//! Acceso a PostgreSQL. Todas las consultas ignoran las filas con
//! `deleted_at` (borrado lógico).

pub mod activity_repository;
pub mod client_repository;
pub mod dashboard_repository;
pub mod document_repository;
pub mod driver_repository;
pub mod site_repository;
pub mod user_repository;
pub mod vehicle_deadline_repository;
pub mod vehicle_repository;
