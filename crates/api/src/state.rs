use std::sync::Arc;

use crate::auth::TokenManager;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: apiforge_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Token lifecycle manager (owns the revocation store).
    pub tokens: Arc<TokenManager>,
    /// Outbound HTTP client used by the execution proxy. reqwest clients
    /// hold an internal connection pool, so one is shared process-wide.
    pub http: reqwest::Client,
}
