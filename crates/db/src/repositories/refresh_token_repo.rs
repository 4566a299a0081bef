//! Repository for the `refresh_tokens` table.
//!
//! The table holds a bounded FIFO queue per user: pushing a token past
//! [`MAX_REFRESH_TOKENS_PER_USER`] evicts the oldest rows in the same
//! statement, so concurrent logins cannot race the capacity check.

use sqlx::PgPool;

use apiforge_core::types::DbId;

use crate::models::refresh_token::{RefreshTokenRecord, MAX_REFRESH_TOKENS_PER_USER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, created_at";

/// Provides queue operations for a user's refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Push a token digest onto the user's queue, evicting beyond capacity.
    ///
    /// Insert and eviction run as one atomic statement: the `keep` CTE
    /// ranks the pre-existing rows together with the inserted one, and the
    /// delete drops everything outside the newest
    /// [`MAX_REFRESH_TOKENS_PER_USER`]. Returns the number of evicted rows.
    pub async fn push(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH inserted AS (
                 INSERT INTO refresh_tokens (user_id, token_hash)
                 VALUES ($1, $2)
                 RETURNING id, created_at
             ),
             keep AS (
                 SELECT id FROM (
                     SELECT id, created_at FROM refresh_tokens WHERE user_id = $1
                     UNION ALL
                     SELECT id, created_at FROM inserted
                 ) live
                 ORDER BY created_at DESC, id DESC
                 LIMIT $3
             )
             DELETE FROM refresh_tokens
             WHERE user_id = $1 AND id NOT IN (SELECT id FROM keep)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(MAX_REFRESH_TOKENS_PER_USER)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Whether the given digest is currently in the user's live set.
    pub async fn contains(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM refresh_tokens WHERE user_id = $1 AND token_hash = $2
             )",
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_one(pool)
        .await
    }

    /// Remove one token from the user's set. Returns the rows removed.
    pub async fn remove(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND token_hash = $2")
                .bind(user_id)
                .bind(token_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Remove every token for a user (logout-all, password change).
    /// Returns the rows removed.
    pub async fn remove_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List a user's live tokens, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RefreshTokenRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM refresh_tokens
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, RefreshTokenRecord>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
