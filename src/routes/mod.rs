//! Rutas HTTP
//!
//! Cada módulo expone un `create_*_router()` que se anida bajo `/api`.
//! `create_router` monta el árbol completo con sus capas.

pub mod activity_routes;
pub mod auth_routes;
pub mod calendar_routes;
pub mod client_routes;
pub mod dashboard_routes;
pub mod document_routes;
pub mod driver_routes;
pub mod note_routes;
pub mod site_routes;
pub mod user_routes;
pub mod vehicle_deadline_routes;
pub mod vehicle_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_layer;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes::create_session_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/clients", client_routes::create_client_router())
        .nest("/sites", site_routes::create_site_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/vehicle-deadlines", vehicle_deadline_routes::create_vehicle_deadline_router())
        .nest("/activities", activity_routes::create_activity_router())
        .nest("/calendar", calendar_routes::create_calendar_router())
        .nest("/documents", document_routes::create_document_router())
        .nest("/notes", note_routes::create_note_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .merge(auth_routes::create_login_router(state.clone()))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(cors_layer(&state.config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check sin autenticación
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
