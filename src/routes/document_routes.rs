use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::dto::common::{ApiResponse, Paginated};
use crate::dto::document_dto::{DocumentFilters, DocumentRequest, DocumentResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_document_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/:id", get(get_document).put(update_document).delete(delete_document))
}

async fn list_documents(
    State(state): State<AppState>,
    Query(filters): Query<DocumentFilters>,
) -> Result<Json<Paginated<DocumentResponse>>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn create_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<DocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponse>>), AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DocumentRequest>,
) -> Result<Json<ApiResponse<DocumentResponse>>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DocumentController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
