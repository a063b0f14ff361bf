mod catalog;
pub mod cors;
pub mod extract;
mod schedules;

use axum::{Router, extract::State, http::StatusCode, middleware, routing::get};

use crate::error::AppError;
use crate::models::{Classroom, Group, Subject, Teacher};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/schedules", schedules::routes())
        .route("/api/teachers", catalog::routes::<Teacher>())
        .route("/api/groups", catalog::routes::<Group>())
        .route("/api/subjects", catalog::routes::<Subject>())
        .route("/api/classrooms", catalog::routes::<Classroom>())
        .layer(middleware::from_fn(cors::cross_origin))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}
