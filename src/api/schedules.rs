use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{MethodRouter, get};
use tracing::debug;

use super::extract::{IdParam, JsonBody};
use crate::error::AppError;
use crate::models::{NewSchedule, Schedule, ScheduleView};
use crate::state::AppState;

pub fn routes() -> MethodRouter<AppState> {
    get(list_schedules)
        .post(create_schedule)
        .put(update_schedule)
        .delete(delete_schedule)
}

async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleView>>, AppError> {
    let schedules = state.store.list_schedules().await?;
    Ok(Json(schedules))
}

async fn create_schedule(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewSchedule>,
) -> Result<Json<Schedule>, AppError> {
    let id = state.store.insert_schedule(&req).await?;
    debug!("created schedule {}", id);
    Ok(Json(req.into_schedule(id)))
}

async fn update_schedule(
    State(state): State<AppState>,
    JsonBody(schedule): JsonBody<Schedule>,
) -> Result<StatusCode, AppError> {
    let affected = state.store.update_schedule(&schedule).await?;
    if affected == 0 {
        debug!("update matched no schedule with id {}", schedule.id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_schedule(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<StatusCode, AppError> {
    let affected = state.store.delete_schedule(id).await?;
    if affected == 0 {
        debug!("delete matched no schedule with id {}", id);
    }
    Ok(StatusCode::NO_CONTENT)
}
