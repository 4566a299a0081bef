//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use apiforge_core::error::CoreError;
use apiforge_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The single message returned for every bearer-auth failure. Missing,
/// malformed, expired, forged, and blacklisted tokens are deliberately
/// indistinguishable to the client.
const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's email (from `claims.email`).
    pub email: String,
    /// The raw bearer token, kept so logout can blacklist it.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(NOT_AUTHORIZED.into())))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(NOT_AUTHORIZED.into())))?;

        let identity = state
            .tokens
            .verify_access(token)
            .await
            .map_err(|_| AppError::Core(CoreError::Unauthorized(NOT_AUTHORIZED.into())))?;

        Ok(AuthUser {
            user_id: identity.user_id,
            email: identity.email,
            token: token.to_string(),
        })
    }
}
