//! Route definitions for the `/history` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/history`.
///
/// ```text
/// GET    /        -> list
/// DELETE /        -> clear (idempotent)
/// GET    /stats   -> stats
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete_one
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list).delete(history::clear))
        .route("/stats", get(history::stats))
        .route(
            "/{id}",
            get(history::get_by_id).delete(history::delete_one),
        )
}
