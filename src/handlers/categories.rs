use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::auth::extract::CurrentUser;
use crate::database::models::{Category, NewCategory};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.categories.list(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(mut payload): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.name = payload.name.trim().to_string();
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Category name must not be empty"));
    }

    let category = state
        .categories
        .create(user.id, payload)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate => ApiError::conflict("Category already exists"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .categories
        .delete(user.id, id)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("Category not found"),
            other => other.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
