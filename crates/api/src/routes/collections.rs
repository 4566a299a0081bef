//! Route definitions for the `/collections` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::collection;
use crate::state::AppState;

/// Routes mounted at `/collections`.
///
/// ```text
/// POST /         -> create
/// GET  /         -> list
/// GET  /{id}     -> get_by_id
/// PUT  /{id}     -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(collection::create).get(collection::list))
        .route(
            "/{id}",
            get(collection::get_by_id)
                .put(collection::update)
                .delete(collection::delete),
        )
}
