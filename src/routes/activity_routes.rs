use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::activity_controller::ActivityController;
use crate::dto::activity_dto::{
    ActivityFilters, ActivityRequest, ActivityResponse, ActivityStatusRequest, AvailabilityQuery,
    AvailabilityResponse,
};
use crate::dto::common::{ApiResponse, Paginated};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_activity_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/availability", get(availability))
        .route("/:id", get(get_activity).put(update_activity).delete(delete_activity))
        .route("/:id/status", patch(change_status))
}

async fn list_activities(
    State(state): State<AppState>,
    Query(filters): Query<ActivityFilters>,
) -> Result<Json<Paginated<ActivityResponse>>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn create_activity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityResponse>>), AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.availability(query).await?;
    Ok(Json(response))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityResponse>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivityRequest>,
) -> Result<Json<ApiResponse<ActivityResponse>>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivityStatusRequest>,
) -> Result<Json<ApiResponse<ActivityResponse>>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.change_status(id, request).await?;
    Ok(Json(response))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ActivityController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
