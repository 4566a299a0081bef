//! Saved request entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use apiforge_core::types::{DbId, Timestamp};

/// A saved request row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub collection_id: DbId,
    pub name: String,
    pub method: String,
    pub url: String,
    pub headers: serde_json::Value,
    pub query_params: serde_json::Value,
    pub body: Option<serde_json::Value>,
    pub description: String,
    /// Ordering index within the owning collection.
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a saved request.
#[derive(Debug, Deserialize)]
pub struct CreateSavedRequest {
    pub collection_id: DbId,
    pub name: String,
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
    #[serde(default)]
    pub query_params: Option<serde_json::Value>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// DTO for updating a saved request. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateSavedRequest {
    pub name: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<serde_json::Value>,
    pub query_params: Option<serde_json::Value>,
    pub body: Option<serde_json::Value>,
    pub description: Option<String>,
    pub position: Option<i32>,
}
