//! Template and template-entry models and DTOs.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timekeep_core::types::{DbId, Timestamp};
use timekeep_core::wallclock;

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `template_entries` table. Times are relative and
/// date-free; they cross the wire as `HH:MM`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub id: DbId,
    pub template_id: DbId,
    #[serde(with = "wallclock::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "wallclock::hhmm")]
    pub end_time: NaiveTime,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// A template together with its entries, sorted by `sort_order`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateWithEntries {
    #[serde(flatten)]
    pub template: Template,
    pub entries: Vec<TemplateEntry>,
}

/// Wire shape of one entry in a create/replace payload. `sort_order` is
/// never accepted from the caller: it is reassigned from array position on
/// every write.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntryInput {
    #[serde(with = "wallclock::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "wallclock::hhmm")]
    pub end_time: NaiveTime,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
}

/// DTO for creating a template with its entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub entries: Vec<TemplateEntryInput>,
}

/// DTO for updating a template. Metadata fields patch individually;
/// `entries`, when present, replaces the existing set wholesale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub entries: Option<Vec<TemplateEntryInput>>,
}
