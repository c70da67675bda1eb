//! Back office de flota y actividades
//!
//! API REST para clientes, sedes, conductores, vehículos, vencimientos,
//! actividades con recursos asignados, documentos, calendario y notas.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
