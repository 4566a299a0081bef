//! Execution history entity model and DTOs.
//!
//! History rows are append-only (no `updated_at`): exactly one row per
//! execution attempt, whether the outbound call completed or failed at
//! the transport level. Rows age out after the retention window via the
//! background purge job, never through this model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apiforge_core::types::{DbId, Timestamp};

/// A single history row. Immutable once created.
///
/// The execution outcome is flattened: `response_*` columns are set for
/// completed calls, `error_*` columns for transport failures. Exactly one
/// of the two groups is populated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub request_id: Option<DbId>,
    pub method: String,
    pub url: String,
    pub headers: serde_json::Value,
    pub body: Option<serde_json::Value>,
    pub response_status: Option<i32>,
    pub response_status_text: Option<String>,
    pub response_headers: Option<serde_json::Value>,
    pub response_body: Option<serde_json::Value>,
    pub response_time_ms: Option<i64>,
    pub response_size_bytes: Option<i64>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub executed_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for appending a new history row.
#[derive(Debug, Clone)]
pub struct CreateHistoryEntry {
    pub user_id: DbId,
    pub request_id: Option<DbId>,
    pub method: String,
    pub url: String,
    pub headers: serde_json::Value,
    pub body: Option<serde_json::Value>,
    pub response_status: Option<i32>,
    pub response_status_text: Option<String>,
    pub response_headers: Option<serde_json::Value>,
    pub response_body: Option<serde_json::Value>,
    pub response_time_ms: Option<i64>,
    pub response_size_bytes: Option<i64>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub executed_at: Timestamp,
}

/// Filter parameters for listing a user's history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// Restrict to one HTTP method (matched case-insensitively).
    pub method: Option<String>,
    /// Substring match against the request URL.
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Per-method aggregate returned by the stats query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MethodStats {
    pub method: String,
    pub count: i64,
    pub avg_time_ms: Option<f64>,
}
