//! Route definitions for the `/environments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::environment;
use crate::state::AppState;

/// Routes mounted at `/environments`.
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
        .route("/", post(environment::create).get(environment::list))
        .route(
            "/{id}",
            get(environment::get_by_id)
                .put(environment::update)
                .delete(environment::delete),
        )
}
