//! Handlers for the `/environments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use apiforge_core::error::CoreError;
use apiforge_core::types::DbId;
use apiforge_db::models::environment::{CreateEnvironment, Environment, UpdateEnvironment};
use apiforge_db::repositories::EnvironmentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/environments
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEnvironment>,
) -> AppResult<(StatusCode, Json<Environment>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Environment name is required".into(),
        )));
    }
    let environment = EnvironmentRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(environment)))
}

/// GET /api/v1/environments
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Environment>>> {
    let environments = EnvironmentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(environments))
}

/// GET /api/v1/environments/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Environment>> {
    let environment = EnvironmentRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Environment",
            id,
        }))?;
    Ok(Json(environment))
}

/// PUT /api/v1/environments/{id}
///
/// Activating an environment deactivates the user's other environments in
/// the same transaction.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEnvironment>,
) -> AppResult<Json<Environment>> {
    let environment = EnvironmentRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Environment",
            id,
        }))?;
    Ok(Json(environment))
}

/// DELETE /api/v1/environments/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EnvironmentRepo::delete(&state.pool, auth.user_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Environment",
            id,
        }))
    }
}
