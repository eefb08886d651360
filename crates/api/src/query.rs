//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

/// Generic pagination parameters (`?page=&limit=`).
///
/// Values are clamped via `timekeep_db::clamp_page` / `clamp_limit` before
/// they reach a query.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Inclusive date range (`?from=YYYY-MM-DD&to=YYYY-MM-DD`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// `?includeArchived=` flag for project listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeArchivedParams {
    #[serde(default)]
    pub include_archived: bool,
}

/// `?includeInactive=` flag for category listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
