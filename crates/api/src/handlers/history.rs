//! Handlers for the `/history` resource.
//!
//! History rows are written by the execute handler only; these endpoints
//! are reads and ownership-scoped deletes over the same store.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use apiforge_core::error::CoreError;
use apiforge_core::types::DbId;
use apiforge_db::models::history::{HistoryEntry, HistoryQuery, MethodStats};
use apiforge_db::repositories::HistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Paginated;
use crate::state::AppState;

/// Response body for `GET /history/stats`.
#[derive(Debug, Serialize)]
pub struct HistoryStats {
    pub total_requests: i64,
    pub by_method: Vec<MethodStats>,
}

/// Response body for `DELETE /history`.
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub deleted_count: u64,
}

/// GET /api/v1/history
///
/// List the user's history, newest first, with optional `method` and
/// `search` filters and `page`/`limit` pagination.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<Paginated<HistoryEntry>>> {
    let entries = HistoryRepo::list(&state.pool, auth.user_id, &params).await?;
    let total = HistoryRepo::count(&state.pool, auth.user_id, &params).await?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    Ok(Json(Paginated::new(entries, page, limit, total)))
}

/// GET /api/v1/history/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<HistoryStats>> {
    let total_requests = HistoryRepo::total_for_user(&state.pool, auth.user_id).await?;
    let by_method = HistoryRepo::stats_by_method(&state.pool, auth.user_id).await?;

    Ok(Json(HistoryStats {
        total_requests,
        by_method,
    }))
}

/// GET /api/v1/history/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<HistoryEntry>> {
    let entry = HistoryRepo::find_by_id(&state.pool, auth.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "History entry",
            id,
        }))?;
    Ok(Json(entry))
}

/// DELETE /api/v1/history/{id}
pub async fn delete_one(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<axum::http::StatusCode> {
    let deleted = HistoryRepo::delete_one(&state.pool, auth.user_id, id).await?;
    if deleted {
        Ok(axum::http::StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "History entry",
            id,
        }))
    }
}

/// DELETE /api/v1/history
///
/// Clear the user's entire history. Idempotent: repeating the call
/// deletes zero additional rows and still succeeds.
pub async fn clear(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ClearHistoryResponse>> {
    let deleted_count = HistoryRepo::delete_all_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(ClearHistoryResponse { deleted_count }))
}
