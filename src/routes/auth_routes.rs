use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::info;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::UserResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::rate_limit::strict_rate_limit_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas públicas: login con rate limit estricto
pub fn create_login_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(state, strict_rate_limit_middleware))
}

/// Rutas de sesión que requieren token
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.revoke_token(&user.jti, user.expires_at).await;
    info!("👋 Logout: {}", user.email);
    Ok(Json(ApiResponse::message("Sesión cerrada")))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.me(&user).await?;
    Ok(Json(response))
}
