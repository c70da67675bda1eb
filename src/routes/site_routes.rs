use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::site_controller::SiteController;
use crate::dto::common::{ApiResponse, Paginated};
use crate::dto::site_dto::{SiteFilters, SiteRequest, SiteResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sites).post(create_site))
        .route("/:id", get(get_site).put(update_site).delete(delete_site))
}

async fn list_sites(
    State(state): State<AppState>,
    Query(filters): Query<SiteFilters>,
) -> Result<Json<Paginated<SiteResponse>>, AppError> {
    let controller = SiteController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn create_site(
    State(state): State<AppState>,
    Json(request): Json<SiteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SiteResponse>>), AppError> {
    let controller = SiteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SiteResponse>, AppError> {
    let controller = SiteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SiteRequest>,
) -> Result<Json<ApiResponse<SiteResponse>>, AppError> {
    let controller = SiteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = SiteController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
