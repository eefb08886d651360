//! Template-application pipeline.
//!
//! Pure stages of materializing a template onto a calendar date: stripping
//! references to archived projects / inactive categories (non-fatal,
//! warning-emitting), converting relative entries to absolute instants, and
//! computing the day's overall boundaries. Database access stays in the
//! repository layer; these functions only see ids and times.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::types::DbId;
use crate::wallclock;

/// A template entry reduced to the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeEntry {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
}

/// Why a reference was stripped from an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    ArchivedProject,
    InactiveCategory,
}

/// A non-fatal warning emitted while validating entry references.
///
/// `entry_index` is the entry's position in the input list, independent of
/// any stored sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub entry_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<DbId>,
    pub message: String,
}

/// Distinct non-null project and category ids referenced by `entries`.
///
/// Callers batch-fetch the referenced rows once per table and skip the
/// lookup entirely when the returned set is empty.
pub fn referenced_ids(entries: &[RelativeEntry]) -> (Vec<DbId>, Vec<DbId>) {
    let projects: BTreeSet<DbId> = entries.iter().filter_map(|e| e.project_id).collect();
    let categories: BTreeSet<DbId> = entries.iter().filter_map(|e| e.category_id).collect();
    (
        projects.into_iter().collect(),
        categories.into_iter().collect(),
    )
}

/// Null out references to projects/categories that are missing or no longer
/// active, returning one warning per stripped reference.
///
/// Entries are never rejected here: a stale pointer degrades to `None` and
/// the caller surfaces the warnings alongside an otherwise successful
/// result.
pub fn strip_stale_references(
    entries: &mut [RelativeEntry],
    live_projects: &HashSet<DbId>,
    active_categories: &HashSet<DbId>,
) -> Vec<ReferenceWarning> {
    let mut warnings = Vec::new();

    for (entry_index, entry) in entries.iter_mut().enumerate() {
        if let Some(project_id) = entry.project_id {
            if !live_projects.contains(&project_id) {
                entry.project_id = None;
                warnings.push(ReferenceWarning {
                    kind: WarningKind::ArchivedProject,
                    entry_index,
                    project_id: Some(project_id),
                    category_id: None,
                    message: format!(
                        "Project {project_id} is archived or missing; reference removed"
                    ),
                });
            }
        }

        if let Some(category_id) = entry.category_id {
            if !active_categories.contains(&category_id) {
                entry.category_id = None;
                warnings.push(ReferenceWarning {
                    kind: WarningKind::InactiveCategory,
                    entry_index,
                    project_id: None,
                    category_id: Some(category_id),
                    message: format!(
                        "Category {category_id} is inactive or missing; reference removed"
                    ),
                });
            }
        }
    }

    warnings
}

/// A template entry pinned to absolute instants on the target date.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedEntry {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub project_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub description: Option<String>,
}

/// Convert every relative entry to absolute instants on `date`.
pub fn materialize(entries: &[RelativeEntry], date: NaiveDate) -> Vec<MaterializedEntry> {
    entries
        .iter()
        .map(|entry| {
            let start_time = wallclock::to_absolute(entry.start_time, date);
            let end_time = wallclock::to_absolute(entry.end_time, date);
            MaterializedEntry {
                start_time,
                end_time,
                duration_minutes: wallclock::duration_minutes(start_time, end_time),
                project_id: entry.project_id,
                category_id: entry.category_id,
                description: entry.description.clone(),
            }
        })
        .collect()
}

/// The overall boundaries of a materialized day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySpan {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Compute the day's span: earliest start, latest end, minute-rounded
/// difference between the two. `None` for an empty list.
pub fn day_span(entries: &[MaterializedEntry]) -> Option<DaySpan> {
    let start_time = entries.iter().map(|e| e.start_time).min()?;
    let end_time = entries.iter().map(|e| e.end_time).max()?;
    Some(DaySpan {
        start_time,
        end_time,
        duration_minutes: wallclock::duration_minutes(start_time, end_time),
    })
}
