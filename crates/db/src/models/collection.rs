//! Collection entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apiforge_core::types::{DbId, Timestamp};

/// A collection row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub is_public: bool,
    /// Denormalized count of saved requests, maintained by the request
    /// repository on create/delete.
    pub request_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new collection.
#[derive(Debug, Deserialize)]
pub struct CreateCollection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// DTO for updating a collection. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_public: Option<bool>,
}
