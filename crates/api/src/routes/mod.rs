pub mod auth;
pub mod collections;
pub mod environments;
pub mod health;
pub mod history;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        mint new access token (public)
/// /auth/logout                         logout (requires auth)
/// /auth/logout-all                     logout everywhere (requires auth)
/// /auth/me                             current user (requires auth)
/// /auth/profile                        update profile (PUT)
/// /auth/change-password                change password (PUT)
///
/// /requests/execute                    execution proxy (POST)
/// /requests                            save request (POST)
/// /requests/collection/{collection_id} list saved requests (GET)
/// /requests/{id}                       get, update, delete
///
/// /history                             list (GET), clear all (DELETE)
/// /history/stats                       per-method stats (GET)
/// /history/{id}                        get, delete
///
/// /collections                         list, create
/// /collections/{id}                    get, update, delete
///
/// /environments                        list, create
/// /environments/{id}                   get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/requests", requests::router())
        .nest("/history", history::router())
        .nest("/collections", collections::router())
        .nest("/environments", environments::router())
}
