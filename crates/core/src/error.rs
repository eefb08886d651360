use chrono::NaiveDate;

use crate::types::DbId;

/// Domain-level error for the timekeep core.
///
/// Every failure that can reach an API caller is one of these variants; the
/// HTTP layer maps each to a status code and a machine-readable code string.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Template application was requested for a template with no entries.
    #[error("Template {template_id} has no entries to apply")]
    TemplateEmpty { template_id: DbId },

    /// The target date already has top-level time entries for this user.
    #[error("Date {date} already has {existing_entries_count} top-level time entries")]
    DateHasEntries {
        date: NaiveDate,
        existing_entries_count: i64,
    },

    /// A template-from-day source entry is not a top-level day entry.
    #[error("Time entry {entry_id} is not a day-mode entry")]
    NotDayModeEntry { entry_id: DbId },

    /// A template-from-day source day has no child blocks.
    #[error("Time entry {entry_id} has no blocks")]
    NoBlocks { entry_id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
