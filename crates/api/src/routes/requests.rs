//! Route definitions for the `/requests` resource (saved requests and the
//! execution proxy).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{execute, request};
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// POST /execute                      -> execute (proxy)
/// POST /                             -> create
/// GET  /collection/{collection_id}   -> list_by_collection
/// GET  /{id}                         -> get_by_id
/// PUT  /{id}                         -> update
/// DELETE /{id}                       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/execute", post(execute::execute))
        .route("/", post(request::create))
        .route("/collection/{collection_id}", get(request::list_by_collection))
        .route(
            "/{id}",
            get(request::get_by_id)
                .put(request::update)
                .delete(request::delete),
        )
}
