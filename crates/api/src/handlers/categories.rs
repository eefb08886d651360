//! Handlers for the `/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use timekeep_core::error::CoreError;
use timekeep_core::types::DbId;
use timekeep_db::models::category::CreateCategory;
use timekeep_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// List the authenticated user's categories.
pub async fn list_categories(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        CategoryRepo::list_for_user(&state.pool, auth.user_id, params.include_inactive).await?;
    tracing::debug!(count = items.len(), "Listed categories");
    Ok(Json(DataResponse { data: items }))
}

/// Create a new category.
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name must not be empty".into(),
        )));
    }

    let created = CategoryRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// Deactivate a category. Inactive categories get stripped from templates
/// when they are next applied.
pub async fn deactivate_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    if category.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this category".into(),
        )));
    }

    CategoryRepo::deactivate(&state.pool, id).await?;
    tracing::info!(id, "Category deactivated");

    let deactivated = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: deactivated }))
}
