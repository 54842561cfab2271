//! Task CRUD endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use serde::Deserialize;

use super::{ApiError, ApiState, auth::require_api_key};
use crate::model::{CategoryFilter, NewTask, Task, TaskId, TaskPatch};

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    /// `null` for uncategorized tasks, a category id, or absent for all
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
}

impl TaskQuery {
    fn filter(&self) -> Result<CategoryFilter, ApiError> {
        match self.category_id.as_deref().map(str::trim) {
            None | Some("" | "all") => Ok(CategoryFilter::All),
            Some("null") => Ok(CategoryFilter::Uncategorized),
            Some(raw) => raw
                .parse()
                .map(CategoryFilter::Category)
                .map_err(|_| ApiError::BadRequest(format!("invalid categoryId: {raw}"))),
        }
    }
}

/// List tasks, highest priority first
async fn list_tasks(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = query.filter()?;
    let tasks = state.store().list_tasks(state.user_id(), filter).await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<Arc<ApiState>>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store().create_task(state.user_id(), task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store().get_task(state.user_id(), id).await?;
    Ok(Json(task))
}

/// Partial update; `"categoryId": null` clears the category
async fn update_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store().update_task(state.user_id(), id, patch).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_task(state.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the tasks router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).patch(update_task).delete(delete_task))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
