//! Handlers for the `/templates` resource.
//!
//! Covers template CRUD, deriving a template from a logged day, and the
//! application flow that materializes a template into real time entries
//! for a target date.

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use timekeep_core::apply::{self, ReferenceWarning, RelativeEntry};
use timekeep_core::error::CoreError;
use timekeep_core::template as template_rules;
use timekeep_core::types::{DbId, Timestamp};
use timekeep_core::wallclock;
use timekeep_db::models::template::{
    CreateTemplate, Template, TemplateEntry, TemplateEntryInput, TemplateWithEntries,
    UpdateTemplate,
};
use timekeep_db::models::time_entry::{EntryMode, NewBlockEntry, NewDayEntry, TimeEntry};
use timekeep_db::repositories::{CategoryRepo, ProjectRepo, TemplateRepo, TimeEntryRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Paginated, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /templates/{id}/apply`.
#[derive(Debug, Deserialize)]
pub struct ApplyTemplateRequest {
    /// Target calendar date (`YYYY-MM-DD`).
    pub date: NaiveDate,
}

/// Request body for `POST /templates/from-day/{day_id}`.
#[derive(Debug, Deserialize)]
pub struct CreateFromDayRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Provenance block attached to a from-day creation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FromDayMeta {
    pub source_day_id: DbId,
    pub block_count: usize,
}

/// Response body for `POST /templates/from-day/{day_id}`.
#[derive(Debug, Serialize)]
pub struct CreateFromDayResponse {
    pub data: TemplateWithEntries,
    pub meta: FromDayMeta,
}

/// An inlined `{id, name}` reference in an applied-day response.
#[derive(Debug, Clone, Serialize)]
pub struct RefSummary {
    pub id: DbId,
    pub name: String,
}

/// One materialized block in an applied-day response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedBlock {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub description: Option<String>,
    pub entry_mode: EntryMode,
    pub project: Option<RefSummary>,
    pub category: Option<RefSummary>,
}

/// The flattened day entry returned by template application, blocks sorted
/// by ascending start time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDay {
    pub id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub duration_minutes: i32,
    pub entry_mode: EntryMode,
    pub blocks: Vec<AppliedBlock>,
}

/// Response body for `POST /templates/{id}/apply`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateResponse {
    pub data: AppliedDay,
    pub template_id: DbId,
    pub template_name: String,
    pub entries_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<ReferenceWarning>>,
}

/// Response body for `DELETE /templates/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a template and verify ownership. Existence is checked before
/// ownership, so a missing id is 404 for everyone.
async fn ensure_owned_template(
    pool: &sqlx::PgPool,
    id: DbId,
    user_id: DbId,
) -> AppResult<Template> {
    let template = TemplateRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    if template.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this template".into(),
        )));
    }
    Ok(template)
}

/// Validate the caller-supplied fields of a create payload.
fn validate_create(input: &CreateTemplate) -> AppResult<()> {
    template_rules::validate_name(&input.name)?;
    if let Some(ref description) = input.description {
        template_rules::validate_description(description)?;
    }
    validate_entry_inputs(&input.entries)
}

/// Validate an entry set's time ordering, entry by entry.
fn validate_entry_inputs(entries: &[TemplateEntryInput]) -> AppResult<()> {
    for (index, entry) in entries.iter().enumerate() {
        template_rules::validate_entry_times(index, entry.start_time, entry.end_time)?;
    }
    Ok(())
}

/// Convert stored entries into the pipeline's relative form.
fn to_relative_entries(entries: &[TemplateEntry]) -> Vec<RelativeEntry> {
    entries
        .iter()
        .map(|entry| RelativeEntry {
            start_time: entry.start_time,
            end_time: entry.end_time,
            project_id: entry.project_id,
            category_id: entry.category_id,
            description: entry.description.clone(),
        })
        .collect()
}

impl AppliedBlock {
    fn from_row(
        row: TimeEntry,
        project_names: &HashMap<DbId, String>,
        category_names: &HashMap<DbId, String>,
    ) -> Self {
        let project = row.project_id.and_then(|id| {
            project_names.get(&id).map(|name| RefSummary {
                id,
                name: name.clone(),
            })
        });
        let category = row.category_id.and_then(|id| {
            category_names.get(&id).map(|name| RefSummary {
                id,
                name: name.clone(),
            })
        });
        Self {
            id: row.id,
            parent_id: row.parent_id,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            description: row.description,
            entry_mode: row.entry_mode,
            project,
            category,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /templates
// ---------------------------------------------------------------------------

/// List the authenticated user's templates, name-ascending, with entries
/// nested and a pagination envelope.
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = timekeep_db::clamp_page(params.page);
    let limit = timekeep_db::clamp_limit(params.limit);
    let offset = (page - 1) * limit;

    let total = TemplateRepo::count_for_user(&state.pool, auth.user_id).await?;
    let templates =
        TemplateRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;

    let ids: Vec<DbId> = templates.iter().map(|t| t.id).collect();
    let mut entries_by_template: HashMap<DbId, Vec<TemplateEntry>> = HashMap::new();
    for entry in TemplateRepo::list_entries_for_templates(&state.pool, &ids).await? {
        entries_by_template
            .entry(entry.template_id)
            .or_default()
            .push(entry);
    }

    let data: Vec<TemplateWithEntries> = templates
        .into_iter()
        .map(|template| {
            let entries = entries_by_template.remove(&template.id).unwrap_or_default();
            TemplateWithEntries { template, entries }
        })
        .collect();

    tracing::debug!(count = data.len(), total, page, "Listed templates");
    Ok(Json(Paginated {
        data,
        pagination: Pagination::new(page, limit, total),
    }))
}

// ---------------------------------------------------------------------------
// POST /templates
// ---------------------------------------------------------------------------

/// Create a new template with its entries.
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let created = TemplateRepo::create_with_entries(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        id = created.template.id,
        name = %created.template.name,
        entries = created.entries.len(),
        "Template created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /templates/{id}
// ---------------------------------------------------------------------------

/// Get a single template with its entries.
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = ensure_owned_template(&state.pool, id, auth.user_id).await?;
    let entries = TemplateRepo::list_entries(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TemplateWithEntries { template, entries },
    }))
}

// ---------------------------------------------------------------------------
// PUT /templates/{id}
// ---------------------------------------------------------------------------

/// Patch a template's metadata and/or replace its entry set wholesale.
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_template(&state.pool, id, auth.user_id).await?;

    if let Some(ref name) = input.name {
        template_rules::validate_name(name)?;
    }
    if let Some(ref description) = input.description {
        template_rules::validate_description(description)?;
    }
    if let Some(ref entries) = input.entries {
        validate_entry_inputs(entries)?;
    }

    let updated = TemplateRepo::update_with_entries(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    tracing::info!(id, "Template updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /templates/{id}
// ---------------------------------------------------------------------------

/// Delete a template. Entries cascade in the schema.
pub async fn delete_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_template(&state.pool, id, auth.user_id).await?;

    TemplateRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Template deleted");
    Ok(Json(DeleteResponse {
        message: "Template deleted",
    }))
}

// ---------------------------------------------------------------------------
// POST /templates/from-day/{day_id}
// ---------------------------------------------------------------------------

/// Derive a new template from an existing logged day: each block's absolute
/// times reduce to relative `HH:MM`, ordered chronologically.
pub async fn create_from_day(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(day_id): Path<DbId>,
    Json(input): Json<CreateFromDayRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. The source must exist and belong to the caller.
    let source = TimeEntryRepo::find_by_id(&state.pool, day_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Time entry",
            id: day_id,
        }))?;
    if source.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this time entry".into(),
        )));
    }

    // 2. Only true top-level day entries can seed a template.
    if source.entry_mode != EntryMode::Day || source.parent_id.is_some() {
        return Err(AppError::Core(CoreError::NotDayModeEntry { entry_id: day_id }));
    }

    // 3. A day without blocks has nothing to capture.
    let blocks = TimeEntryRepo::list_blocks(&state.pool, day_id).await?;
    if blocks.is_empty() {
        return Err(AppError::Core(CoreError::NoBlocks { entry_id: day_id }));
    }

    template_rules::validate_name(&input.name)?;
    if let Some(ref description) = input.description {
        template_rules::validate_description(description)?;
    }

    // 4. Reduce blocks (already chronological) to relative entries; array
    //    position becomes the stored sort order.
    let block_count = blocks.len();
    let entries: Vec<TemplateEntryInput> = blocks
        .into_iter()
        .map(|block| TemplateEntryInput {
            start_time: wallclock::to_relative(block.start_time),
            end_time: wallclock::to_relative(block.end_time),
            project_id: block.project_id,
            category_id: block.category_id,
            description: block.description,
        })
        .collect();

    let created = TemplateRepo::create_with_entries(
        &state.pool,
        auth.user_id,
        &CreateTemplate {
            name: input.name,
            description: input.description,
            entries,
        },
    )
    .await?;
    tracing::info!(
        id = created.template.id,
        source_day_id = day_id,
        block_count,
        "Template created from day"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateFromDayResponse {
            data: created,
            meta: FromDayMeta {
                source_day_id: day_id,
                block_count,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /templates/{id}/apply
// ---------------------------------------------------------------------------

/// Apply a template to a date, materializing its relative entries into a
/// day entry plus blocks. Strictly sequential gates; the first failure
/// aborts the whole application.
pub async fn apply_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApplyTemplateRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Load and authorize the template.
    let template = ensure_owned_template(&state.pool, id, auth.user_id).await?;
    let stored_entries = TemplateRepo::list_entries(&state.pool, id).await?;

    // 2. An empty template has nothing to apply.
    if stored_entries.is_empty() {
        return Err(AppError::Core(CoreError::TemplateEmpty { template_id: id }));
    }

    // 3. The target date must not already have top-level entries.
    let existing =
        TimeEntryRepo::count_top_level_on_date(&state.pool, auth.user_id, input.date).await?;
    if existing > 0 {
        return Err(AppError::Core(CoreError::DateHasEntries {
            date: input.date,
            existing_entries_count: existing,
        }));
    }

    // 4. Strip references to archived projects / inactive categories
    //    (non-fatal; surfaced as warnings).
    let mut entries = to_relative_entries(&stored_entries);
    let (project_ids, category_ids) = apply::referenced_ids(&entries);
    let project_refs = ProjectRepo::find_refs(&state.pool, &project_ids).await?;
    let category_refs = CategoryRepo::find_refs(&state.pool, &category_ids).await?;

    let live_projects: HashSet<DbId> = project_refs
        .iter()
        .filter(|p| !p.is_archived)
        .map(|p| p.id)
        .collect();
    let active_categories: HashSet<DbId> = category_refs
        .iter()
        .filter(|c| c.is_active)
        .map(|c| c.id)
        .collect();
    let warnings = apply::strip_stale_references(&mut entries, &live_projects, &active_categories);

    // 5-6. Materialize onto the target date and compute the day's span.
    let materialized = apply::materialize(&entries, input.date);
    let span = apply::day_span(&materialized)
        .ok_or(AppError::Core(CoreError::TemplateEmpty { template_id: id }))?;

    // 7-8. Insert the day and its blocks in one transaction; a failing
    //      block insert rolls the day back with it.
    let day = NewDayEntry {
        start_time: span.start_time,
        end_time: span.end_time,
        duration_minutes: span.duration_minutes as i32,
    };
    let blocks: Vec<NewBlockEntry> = materialized
        .into_iter()
        .map(|entry| NewBlockEntry {
            start_time: entry.start_time,
            end_time: entry.end_time,
            duration_minutes: entry.duration_minutes as i32,
            project_id: entry.project_id,
            category_id: entry.category_id,
            description: entry.description,
        })
        .collect();

    let (day_row, block_rows) =
        TimeEntryRepo::create_day_with_blocks(&state.pool, auth.user_id, &day, &blocks)
            .await
            .map_err(AppError::CreateFailed)?;

    // 9. Assemble the response: blocks by ascending start time, references
    //    inlined as {id, name}.
    let project_names: HashMap<DbId, String> = project_refs
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let category_names: HashMap<DbId, String> = category_refs
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut applied_blocks: Vec<AppliedBlock> = block_rows
        .into_iter()
        .map(|row| AppliedBlock::from_row(row, &project_names, &category_names))
        .collect();
    applied_blocks.sort_by_key(|b| b.start_time);

    let entries_applied = applied_blocks.len();
    tracing::info!(
        template_id = id,
        user_id = auth.user_id,
        date = %input.date,
        entries_applied,
        warnings = warnings.len(),
        "Template applied"
    );

    Ok(Json(ApplyTemplateResponse {
        data: AppliedDay {
            id: day_row.id,
            user_id: day_row.user_id,
            parent_id: day_row.parent_id,
            start_time: day_row.start_time,
            end_time: day_row.end_time,
            duration_minutes: day_row.duration_minutes,
            entry_mode: day_row.entry_mode,
            blocks: applied_blocks,
        },
        template_id: id,
        template_name: template.name,
        entries_applied,
        warnings: (!warnings.is_empty()).then_some(warnings),
    }))
}
