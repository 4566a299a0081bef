//! Repository for the `history` table.
//!
//! Appends are the only write path besides ownership-scoped deletes and
//! the retention purge; rows are never updated.

use sqlx::PgPool;

use apiforge_core::types::{DbId, Timestamp};

use crate::models::history::{CreateHistoryEntry, HistoryEntry, HistoryQuery, MethodStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, request_id, method, url, headers, body, \
    response_status, response_status_text, response_headers, response_body, \
    response_time_ms, response_size_bytes, error_message, error_code, \
    executed_at, created_at";

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for history listing.
const DEFAULT_LIMIT: i64 = 20;

/// Provides append, query, and delete operations for execution history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append one history row, returning the created entry.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateHistoryEntry,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO history (
                 user_id, request_id, method, url, headers, body,
                 response_status, response_status_text, response_headers,
                 response_body, response_time_ms, response_size_bytes,
                 error_message, error_code, executed_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(input.user_id)
            .bind(input.request_id)
            .bind(&input.method)
            .bind(&input.url)
            .bind(&input.headers)
            .bind(&input.body)
            .bind(input.response_status)
            .bind(&input.response_status_text)
            .bind(&input.response_headers)
            .bind(&input.response_body)
            .bind(input.response_time_ms)
            .bind(input.response_size_bytes)
            .bind(&input.error_message)
            .bind(&input.error_code)
            .bind(input.executed_at)
            .fetch_one(pool)
            .await
    }

    /// List a user's history, newest first, with optional method/URL
    /// filters and page-based pagination.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        params: &HistoryQuery,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let (limit, offset) = page_bounds(params);
        let query = format!(
            "SELECT {COLUMNS} FROM history
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR method = UPPER($2))
               AND ($3::TEXT IS NULL OR url ILIKE '%' || $3 || '%')
             ORDER BY executed_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(user_id)
            .bind(&params.method)
            .bind(&params.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's history rows matching the same filters as [`list`].
    ///
    /// [`list`]: HistoryRepo::list
    pub async fn count(
        pool: &PgPool,
        user_id: DbId,
        params: &HistoryQuery,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM history
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR method = UPPER($2))
               AND ($3::TEXT IS NULL OR url ILIKE '%' || $3 || '%')",
        )
        .bind(user_id)
        .bind(&params.method)
        .bind(&params.search)
        .fetch_one(pool)
        .await
    }

    /// Find one entry, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<HistoryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete one entry, scoped to its owner. Returns `true` if a row was
    /// deleted.
    pub async fn delete_one(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all of a user's history. Idempotent: a second call deletes
    /// zero rows. Returns the deleted count.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Per-method aggregates (count and average response time) for a user.
    pub async fn stats_by_method(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<MethodStats>, sqlx::Error> {
        sqlx::query_as::<_, MethodStats>(
            "SELECT method,
                    COUNT(*)::BIGINT AS count,
                    AVG(response_time_ms)::DOUBLE PRECISION AS avg_time_ms
             FROM history
             WHERE user_id = $1
             GROUP BY method
             ORDER BY count DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Total number of history rows for a user.
    pub async fn total_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM history WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Delete rows executed before `cutoff`. Used only by the retention
    /// job. Returns the deleted count.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE executed_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Resolve `(limit, offset)` from page-based parameters, clamped to sane
/// bounds.
fn page_bounds(params: &HistoryQuery) -> (i64, i64) {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = params.page.unwrap_or(1).max(1);
    (limit, (page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_defaults() {
        let params = HistoryQuery::default();
        assert_eq!(page_bounds(&params), (DEFAULT_LIMIT, 0));
    }

    #[test]
    fn test_page_bounds_clamping() {
        let params = HistoryQuery {
            page: Some(0),
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(page_bounds(&params), (MAX_LIMIT, 0));

        let params = HistoryQuery {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(page_bounds(&params), (25, 50));
    }
}
