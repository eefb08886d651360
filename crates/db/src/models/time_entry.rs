//! Time-entry model and DTOs.
//!
//! A top-level row (`parent_id IS NULL`) is a "day" aggregate; child rows
//! are the blocks inside it. `entry_mode` records how a row was produced
//! and is a closed enum on both sides of the database boundary.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timekeep_core::types::{DbId, Timestamp};

/// How a time entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entry_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Entered directly as a day with blocks.
    Day,
    /// A single standalone entry.
    Simple,
    /// Materialized by applying a template.
    Template,
}

/// A row from the `time_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
    pub entry_mode: EntryMode,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a time entry directly (day or block).
#[derive(Debug, Clone)]
pub struct CreateTimeEntry {
    pub parent_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
    pub entry_mode: EntryMode,
}

/// The parent row of a template application: aggregated span, no
/// project/category/description of its own.
#[derive(Debug, Clone)]
pub struct NewDayEntry {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
}

/// One block of a template application.
#[derive(Debug, Clone)]
pub struct NewBlockEntry {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
}
