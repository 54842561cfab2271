//! Category CRUD endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch},
};

use super::{ApiError, ApiState, auth::require_api_key};
use crate::model::{Category, CategoryId, CategoryPatch, NewCategory};

/// List categories by name
async fn list_categories(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.store().list_categories(state.user_id()).await?;
    Ok(Json(categories))
}

/// Create a category; duplicate names answer 409
async fn create_category(
    State(state): State<Arc<ApiState>>,
    Json(category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state
        .store()
        .create_category(state.user_id(), category)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<CategoryId>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .store()
        .update_category(state.user_id(), id, patch)
        .await?;
    Ok(Json(category))
}

/// Delete a category; its tasks become uncategorized
async fn delete_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_category(state.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the categories router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", patch(update_category).delete(delete_category))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
