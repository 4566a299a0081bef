//! Handler for `POST /requests/execute` -- the execution proxy endpoint.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use apiforge_core::error::CoreError;
use apiforge_core::execution::{ExecutionOutcome, RequestDescriptor};
use apiforge_core::types::DbId;
use apiforge_db::models::history::CreateHistoryEntry;
use apiforge_db::repositories::HistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::proxy;
use crate::state::AppState;

/// Response body for a completed proxied call (any HTTP status).
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub data: serde_json::Value,
    /// Wall-clock response time in milliseconds.
    pub time: i64,
    /// Response body size in bytes.
    pub size: i64,
}

/// POST /api/v1/requests/execute
///
/// Execute the described request against the remote endpoint and record
/// the outcome as history. Any received HTTP response returns 200 with
/// that response's status inside the body; a transport failure returns
/// 500 with a descriptive message. A history row is written in both
/// cases, before this handler responds.
pub async fn execute(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(descriptor): Json<RequestDescriptor>,
) -> AppResult<Json<ExecuteResponse>> {
    descriptor.validate()?;
    reqwest::Url::parse(&descriptor.url)
        .map_err(|e| CoreError::Validation(format!("URL must be a valid URI: {e}")))?;

    let client = state.http.clone();
    let pool = state.pool.clone();
    let user_id = auth.user_id;

    // Run execute-and-record on a detached task: if the client disconnects
    // mid-flight, the outbound call still completes and the history row is
    // still written, so the audit trail has no gaps.
    let outcome = tokio::spawn(async move {
        let executed_at = Utc::now();
        let outcome = proxy::execute(&client, &descriptor).await;
        record_history(&pool, user_id, &descriptor, &outcome, executed_at).await;
        outcome
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Execution task failed: {e}")))?;

    match outcome {
        ExecutionOutcome::Completed {
            status,
            status_text,
            headers,
            body,
            elapsed_ms,
            size_bytes,
        } => Ok(Json(ExecuteResponse {
            status,
            status_text,
            headers,
            data: body,
            time: elapsed_ms,
            size: size_bytes,
        })),
        ExecutionOutcome::Failed { message, .. } => Err(AppError::ExecutionFailed(message)),
    }
}

/// Persist one history row for an execution attempt.
///
/// A persistence failure is logged and swallowed: the caller must still
/// learn the true result of their HTTP call even if auditing failed.
async fn record_history(
    pool: &PgPool,
    user_id: DbId,
    descriptor: &RequestDescriptor,
    outcome: &ExecutionOutcome,
    executed_at: apiforge_core::types::Timestamp,
) {
    let mut entry = CreateHistoryEntry {
        user_id,
        request_id: descriptor.request_id,
        method: descriptor.normalized_method(),
        url: descriptor.url.clone(),
        headers: serde_json::to_value(&descriptor.headers)
            .unwrap_or_else(|_| serde_json::json!({})),
        body: descriptor.body.clone(),
        response_status: None,
        response_status_text: None,
        response_headers: None,
        response_body: None,
        response_time_ms: None,
        response_size_bytes: None,
        error_message: None,
        error_code: None,
        executed_at,
    };

    match outcome {
        ExecutionOutcome::Completed {
            status,
            status_text,
            headers,
            body,
            elapsed_ms,
            size_bytes,
        } => {
            entry.response_status = Some(*status as i32);
            entry.response_status_text = Some(status_text.clone());
            entry.response_headers =
                Some(serde_json::to_value(headers).unwrap_or_else(|_| serde_json::json!({})));
            entry.response_body = Some(body.clone());
            entry.response_time_ms = Some(*elapsed_ms);
            entry.response_size_bytes = Some(*size_bytes);
        }
        ExecutionOutcome::Failed { message, code } => {
            entry.error_message = Some(message.clone());
            entry.error_code = code.clone();
        }
    }

    if let Err(e) = HistoryRepo::insert(pool, &entry).await {
        tracing::error!(
            error = %e,
            user_id,
            url = %entry.url,
            "Failed to persist history entry for execution"
        );
    }
}
