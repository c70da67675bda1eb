//! Services module
//!
//! Este módulo contiene la lógica de negocio que no depende de la base de
//! datos: disponibilidad de recursos, agrupación del calendario, notas
//! autoguardadas y autenticación.

pub mod auth_service;
pub mod availability_service;
pub mod calendar_service;
pub mod note_store;
