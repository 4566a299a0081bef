//! Environment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apiforge_core::types::{DbId, Timestamp};

/// An environment row from the `environments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Environment {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    /// Variable map (`{ "BASE_URL": "https://...", ... }`).
    pub variables: serde_json::Value,
    /// At most one environment per user is active at a time.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an environment.
#[derive(Debug, Deserialize)]
pub struct CreateEnvironment {
    pub name: String,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// DTO for updating an environment. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateEnvironment {
    pub name: Option<String>,
    pub variables: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
