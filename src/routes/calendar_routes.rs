use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::calendar_controller::CalendarController;
use crate::dto::calendar_dto::{CalendarQuery, CalendarResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_calendar_router() -> Router<AppState> {
    Router::new()
        .route("/weekly", get(weekly))
        .route("/daily", get(daily))
}

async fn weekly(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let controller = CalendarController::new(state.pool.clone());
    let response = controller.weekly(query).await?;
    Ok(Json(response))
}

async fn daily(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let controller = CalendarController::new(state.pool.clone());
    let response = controller.daily(query).await?;
    Ok(Json(response))
}
