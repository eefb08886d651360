//! Category model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timekeep_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: String,
}

/// Minimal projection used for reference validation and response inlining.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub is_active: bool,
}
