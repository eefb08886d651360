//! Project model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timekeep_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
}

/// Minimal projection used for reference validation and for inlining
/// `{id, name}` objects into applied-day responses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub is_archived: bool,
}
