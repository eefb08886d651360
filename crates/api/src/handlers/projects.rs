//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeep_core::error::CoreError;
use timekeep_core::types::DbId;
use timekeep_db::models::project::CreateProject;
use timekeep_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::IncludeArchivedParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// List the authenticated user's projects.
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        ProjectRepo::list_for_user(&state.pool, auth.user_id, params.include_archived).await?;
    tracing::debug!(count = items.len(), "Listed projects");
    Ok(Json(DataResponse { data: items }))
}

/// Create a new project.
pub async fn create_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }

    let created = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// Archive a project. Archived projects stay attached to historical rows
/// but get stripped from templates when they are next applied.
pub async fn archive_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    if project.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this project".into(),
        )));
    }

    ProjectRepo::archive(&state.pool, id).await?;
    tracing::info!(id, "Project archived");

    let archived = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: archived }))
}
