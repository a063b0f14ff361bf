//! Generic CRUD handlers for teachers, groups, subjects and classrooms.
//!
//! Each handler is instantiated once per [`Catalog`] type in the router.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{MethodRouter, get};
use tracing::debug;

use super::extract::{IdParam, JsonBody};
use crate::error::AppError;
use crate::models::Catalog;
use crate::state::AppState;

pub fn routes<T: Catalog>() -> MethodRouter<AppState> {
    get(list::<T>)
        .post(create::<T>)
        .put(update::<T>)
        .delete(remove::<T>)
}

async fn list<T: Catalog>(State(state): State<AppState>) -> Result<Json<Vec<T>>, AppError> {
    let rows = state.store.list_named(T::TABLE).await?;
    Ok(Json(rows.into_iter().map(T::from_row).collect()))
}

async fn create<T: Catalog>(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<T::Draft>,
) -> Result<Json<T>, AppError> {
    let id = state.store.insert_named(T::TABLE, T::draft_name(&draft)).await?;
    debug!("created {} {}", T::TABLE.label(), id);
    Ok(Json(T::from_draft(id, draft)))
}

async fn update<T: Catalog>(
    State(state): State<AppState>,
    JsonBody(record): JsonBody<T>,
) -> Result<StatusCode, AppError> {
    let affected = state
        .store
        .update_named(T::TABLE, record.id(), record.name())
        .await?;
    if affected == 0 {
        debug!("update matched no {} with id {}", T::TABLE.label(), record.id());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn remove<T: Catalog>(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<StatusCode, AppError> {
    let affected = state.store.delete_named(T::TABLE, id).await?;
    if affected == 0 {
        debug!("delete matched no {} with id {}", T::TABLE.label(), id);
    }
    Ok(StatusCode::NO_CONTENT)
}
