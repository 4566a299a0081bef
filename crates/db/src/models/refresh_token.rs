//! Refresh-token queue model.
//!
//! A user owns a bounded FIFO queue of refresh tokens (capacity 5). Only
//! the SHA-256 digest of the signed token is stored so a database leak
//! cannot replay active credentials.

use sqlx::FromRow;

use apiforge_core::types::{DbId, Timestamp};

/// One live refresh token for a user, stored as a digest.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub created_at: Timestamp,
}

/// Maximum number of live refresh tokens per user. Pushing one past this
/// capacity evicts the oldest in the same statement.
pub const MAX_REFRESH_TOKENS_PER_USER: i64 = 5;
