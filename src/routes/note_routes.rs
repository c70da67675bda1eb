use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::note_controller::NoteController;
use crate::dto::common::ApiResponse;
use crate::dto::note_dto::NoteRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::note::Note;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Notas autoguardadas del usuario autenticado
pub fn create_note_router() -> Router<AppState> {
    Router::new().route("/:key", get(get_note).put(save_note).delete(delete_note))
}

async fn get_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
) -> Result<Json<Note>, AppError> {
    let controller = NoteController::new(state.notes.clone());
    let note = controller.get(user.user_id, &key).await?;
    Ok(Json(note))
}

async fn save_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<Note>, AppError> {
    let controller = NoteController::new(state.notes.clone());
    let note = controller.save(user.user_id, &key, request).await?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = NoteController::new(state.notes.clone());
    controller.delete(user.user_id, &key).await?;
    Ok(Json(ApiResponse::message("Nota eliminada")))
}
