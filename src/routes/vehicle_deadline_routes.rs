use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_deadline_controller::VehicleDeadlineController;
use crate::dto::common::{ApiResponse, Paginated};
use crate::dto::deadline_dto::{DeadlineFilters, DeadlineRequest, DeadlineResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_deadline_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deadlines).post(create_deadline))
        .route("/:id", get(get_deadline).put(update_deadline).delete(delete_deadline))
        .route("/:id/complete", post(complete_deadline))
}

async fn list_deadlines(
    State(state): State<AppState>,
    Query(filters): Query<DeadlineFilters>,
) -> Result<Json<Paginated<DeadlineResponse>>, AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn create_deadline(
    State(state): State<AppState>,
    Json(request): Json<DeadlineRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DeadlineResponse>>), AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_deadline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeadlineResponse>, AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_deadline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeadlineRequest>,
) -> Result<Json<ApiResponse<DeadlineResponse>>, AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn complete_deadline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeadlineResponse>>, AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.complete(id).await?;
    Ok(Json(response))
}

async fn delete_deadline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleDeadlineController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
