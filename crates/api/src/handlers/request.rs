//! Handlers for the `/requests` resource (saved requests).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use apiforge_core::error::CoreError;
use apiforge_core::execution::{validate_absolute_http_url, ALLOWED_METHODS};
use apiforge_core::types::DbId;
use apiforge_db::models::request::{CreateSavedRequest, SavedRequest, UpdateSavedRequest};
use apiforge_db::repositories::{CollectionRepo, SavedRequestRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Validate the method/URL fields shared by create and update.
fn validate_request_shape(method: Option<&str>, url: Option<&str>) -> Result<(), CoreError> {
    if let Some(method) = method {
        if !ALLOWED_METHODS.contains(&method.to_ascii_uppercase().as_str()) {
            return Err(CoreError::Validation(format!(
                "Method must be one of: {}",
                ALLOWED_METHODS.join(", ")
            )));
        }
    }
    if let Some(url) = url {
        validate_absolute_http_url(url)?;
    }
    Ok(())
}

/// POST /api/v1/requests
///
/// Save a request into a collection the user owns and bump the
/// collection's request counter.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSavedRequest>,
) -> AppResult<(StatusCode, Json<SavedRequest>)> {
    validate_request_shape(Some(&input.method), Some(&input.url))?;

    let collection = CollectionRepo::find_by_id(&state.pool, auth.user_id, input.collection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id: input.collection_id,
        }))?;

    let request = SavedRequestRepo::create(&state.pool, auth.user_id, &input).await?;
    CollectionRepo::increment_request_count(&state.pool, collection.id).await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/v1/requests/collection/{collection_id}
pub async fn list_by_collection(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(collection_id): Path<DbId>,
) -> AppResult<Json<Vec<SavedRequest>>> {
    CollectionRepo::find_by_id(&state.pool, auth.user_id, collection_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id: collection_id,
        }))?;

    let requests =
        SavedRequestRepo::list_for_collection(&state.pool, auth.user_id, collection_id).await?;
    Ok(Json(requests))
}

/// GET /api/v1/requests/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SavedRequest>> {
    let request = SavedRequestRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;
    Ok(Json(request))
}

/// PUT /api/v1/requests/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSavedRequest>,
) -> AppResult<Json<SavedRequest>> {
    validate_request_shape(input.method.as_deref(), input.url.as_deref())?;

    let request = SavedRequestRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;
    Ok(Json(request))
}

/// DELETE /api/v1/requests/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let request = SavedRequestRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;

    SavedRequestRepo::delete(&state.pool, auth.user_id, id).await?;
    CollectionRepo::decrement_request_count(&state.pool, request.collection_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
