//! Handlers for the `/collections` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use apiforge_core::error::CoreError;
use apiforge_core::types::DbId;
use apiforge_db::models::collection::{Collection, CreateCollection, UpdateCollection};
use apiforge_db::repositories::CollectionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/collections
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCollection>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Collection name is required".into(),
        )));
    }
    let collection = CollectionRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /api/v1/collections
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Collection>>> {
    let collections = CollectionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(collections))
}

/// GET /api/v1/collections/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Collection>> {
    let collection = CollectionRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))?;
    Ok(Json(collection))
}

/// PUT /api/v1/collections/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollection>,
) -> AppResult<Json<Collection>> {
    let collection = CollectionRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))?;
    Ok(Json(collection))
}

/// DELETE /api/v1/collections/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CollectionRepo::delete(&state.pool, auth.user_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Collection",
            id,
        }))
    }
}
