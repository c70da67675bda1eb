//! Tests de la API que no necesitan PostgreSQL: el pool es lazy y las
//! notas usan el almacén en memoria.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use fleet_backoffice::config::database::DatabaseConfig;
use fleet_backoffice::models::user::UserRole;
use fleet_backoffice::routes::create_router;
use fleet_backoffice::state::AppState;

use common::{send, state_with_pool, test_config, token_for};

fn test_state(extra: &[(&str, &str)]) -> AppState {
    let config = test_config("postgres://localhost:1/fleet_test", extra);
    let pool = DatabaseConfig::from(&config).create_lazy_pool().unwrap();
    state_with_pool(pool, config)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_router(test_state(&[]));
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_router(test_state(&[]));

    let (status, body) = send(&app, Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/clients", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = create_router(test_state(&[]));
    let other = test_state(&[("JWT_SECRET", "another-secret")]);
    let token = token_for(&other, Uuid::new_v4(), UserRole::Admin);

    let (status, _) = send(&app, Method::GET, "/api/notes/draft", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notes_autosave_flow() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let (status, _) = send(&app, Method::GET, "/api/notes/activity:new", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/notes/activity:new",
        Some(&token),
        Some(json!({ "content": "Portare il badge del cantiere" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "activity:new");
    assert!(body["updated_at"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/notes/activity:new", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Portare il badge del cantiere");

    let (status, _) = send(&app, Method::DELETE, "/api/notes/activity:new", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/notes/activity:new", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notes_are_private_per_user() {
    let state = test_state(&[]);
    let alice = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let bob = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let (status, _) = send(&app, Method::PUT, "/api/notes/draft", Some(&alice), Some(json!({ "content": "x" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/notes/draft", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_note_key_and_oversized_content() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let (status, _) = send(&app, Method::GET, "/api/notes/bad%20key", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let content = "a".repeat(20_001);
    let (status, _) = send(&app, Method::PUT, "/api/notes/draft", Some(&token), Some(json!({ "content": content }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let (status, _) = send(&app, Method::PUT, "/api/notes/draft", Some(&token), Some(json!({ "content": "x" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, Method::GET, "/api/notes/draft", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let (status, body) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/users/{}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_validation_and_strict_rate_limit() {
    let app = create_router(test_state(&[("RATE_LIMIT_REQUESTS", "2")]));
    let body = json!({ "email": "not-an-email", "password": "secret" });

    let (status, _) = send(&app, Method::POST, "/api/login", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(body)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_calendar_rejects_out_of_range_dates() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    for uri in [
        "/api/calendar/daily?date=%2B262142-12-31",
        "/api/calendar/weekly?date=%2B262142-12-31",
        "/api/calendar/weekly?date=0000-01-01",
    ] {
        let (status, body) = send(&app, Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_documents_reject_huge_expiring_window() {
    let state = test_state(&[]);
    let token = token_for(&state, Uuid::new_v4(), UserRole::Operator);
    let app = create_router(state);

    let uri = format!("/api/documents?expiring_within={}", i64::MAX);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, "/api/documents?expiring_within=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_router(test_state(&[]));
    let (status, _) = send(&app, Method::GET, "/api/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
