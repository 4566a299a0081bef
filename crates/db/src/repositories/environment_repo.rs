//! Repository for the `environments` table.
//!
//! A user has at most one active environment. Activation happens inside a
//! transaction that first deactivates the user's other rows, so two
//! concurrent activations cannot leave two rows active.

use sqlx::PgPool;

use apiforge_core::types::DbId;

use crate::models::environment::{CreateEnvironment, Environment, UpdateEnvironment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, variables, is_active, created_at, updated_at";

/// Provides CRUD operations for environments. Every query is scoped to
/// the owning user.
pub struct EnvironmentRepo;

impl EnvironmentRepo {
    /// Insert a new environment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateEnvironment,
    ) -> Result<Environment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let is_active = input.is_active.unwrap_or(false);
        if is_active {
            sqlx::query("UPDATE environments SET is_active = FALSE WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO environments (user_id, name, variables, is_active)
             VALUES ($1, $2, COALESCE($3, '{{}}'::jsonb), $4)
             RETURNING {COLUMNS}"
        );
        let environment = sqlx::query_as::<_, Environment>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.variables)
            .bind(is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(environment)
    }

    /// List a user's environments by name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Environment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM environments
             WHERE user_id = $1
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Environment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one environment, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Environment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM environments WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Environment>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update an environment. Only non-`None` fields in `input` are
    /// applied; activating deactivates the user's other environments in
    /// the same transaction. Returns `None` if the environment does not
    /// exist or is not owned by `user_id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateEnvironment,
    ) -> Result<Option<Environment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_active == Some(true) {
            sqlx::query("UPDATE environments SET is_active = FALSE WHERE user_id = $1 AND id <> $2")
                .bind(user_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "UPDATE environments SET
                name = COALESCE($3, name),
                variables = COALESCE($4, variables),
                is_active = COALESCE($5, is_active)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let environment = sqlx::query_as::<_, Environment>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.variables)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(environment)
    }

    /// Delete an environment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM environments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
