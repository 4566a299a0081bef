//! Repository for the `requests` table (saved requests).

use sqlx::PgPool;

use apiforge_core::types::DbId;

use crate::models::request::{CreateSavedRequest, SavedRequest, UpdateSavedRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, collection_id, name, method, url, headers, query_params, \
    body, description, position, created_at, updated_at";

/// Provides CRUD operations for saved requests. Every query is scoped to
/// the owning user.
pub struct SavedRequestRepo;

impl SavedRequestRepo {
    /// Insert a new saved request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateSavedRequest,
    ) -> Result<SavedRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (user_id, collection_id, name, method, url, headers,
                                   query_params, body, description, position)
             VALUES ($1, $2, $3, UPPER($4), $5,
                     COALESCE($6, '{{}}'::jsonb), COALESCE($7, '{{}}'::jsonb),
                     $8, COALESCE($9, ''), COALESCE($10, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedRequest>(&query)
            .bind(user_id)
            .bind(input.collection_id)
            .bind(&input.name)
            .bind(&input.method)
            .bind(&input.url)
            .bind(&input.headers)
            .bind(&input.query_params)
            .bind(&input.body)
            .bind(&input.description)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    /// List the saved requests in a collection, by position then recency.
    pub async fn list_for_collection(
        pool: &PgPool,
        user_id: DbId,
        collection_id: DbId,
    ) -> Result<Vec<SavedRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE collection_id = $1 AND user_id = $2
             ORDER BY position ASC, created_at DESC"
        );
        sqlx::query_as::<_, SavedRequest>(&query)
            .bind(collection_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one saved request, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<SavedRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, SavedRequest>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a saved request. Only non-`None` fields in `input` are
    /// applied. Returns `None` if the request does not exist or is not
    /// owned by `user_id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateSavedRequest,
    ) -> Result<Option<SavedRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                name = COALESCE($3, name),
                method = COALESCE(UPPER($4), method),
                url = COALESCE($5, url),
                headers = COALESCE($6, headers),
                query_params = COALESCE($7, query_params),
                body = COALESCE($8, body),
                description = COALESCE($9, description),
                position = COALESCE($10, position)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedRequest>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.method)
            .bind(&input.url)
            .bind(&input.headers)
            .bind(&input.query_params)
            .bind(&input.body)
            .bind(&input.description)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    /// Delete a saved request. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
