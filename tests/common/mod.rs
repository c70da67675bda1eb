//! Utilidades compartidas por los tests de integración

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fleet_backoffice::config::EnvironmentConfig;
use fleet_backoffice::models::user::UserRole;
use fleet_backoffice::services::note_store::MemoryNoteStore;
use fleet_backoffice::state::AppState;
use fleet_backoffice::utils::jwt::generate_token;

pub fn test_config(database_url: &str, extra: &[(&str, &str)]) -> EnvironmentConfig {
    let mut vars = vec![("DATABASE_URL", database_url), ("JWT_SECRET", "test-secret")];
    vars.extend_from_slice(extra);
    let vars: Vec<(String, String)> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

    EnvironmentConfig::from_lookup(|key| vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())).unwrap()
}

pub fn state_with_pool(pool: PgPool, config: EnvironmentConfig) -> AppState {
    AppState::new(pool, config, Arc::new(MemoryNoteStore::new(Duration::from_secs(3600))))
}

pub fn token_for(state: &AppState, user_id: Uuid, role: UserRole) -> String {
    generate_token(user_id, "tester@example.com", role, &state.jwt).unwrap().0
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
