//! Handlers for the `/time-entries` resource (read-only listing; entries
//! themselves are produced by template application or direct entry paths).

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use timekeep_core::error::CoreError;
use timekeep_db::repositories::TimeEntryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// List the authenticated user's time entries (days and blocks) starting
/// within an inclusive date range.
pub async fn list_time_entries(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    if params.from > params.to {
        return Err(AppError::Core(CoreError::Validation(
            "'from' must not be after 'to'".into(),
        )));
    }

    let items =
        TimeEntryRepo::list_for_user_between(&state.pool, auth.user_id, params.from, params.to)
            .await?;
    tracing::debug!(count = items.len(), "Listed time entries");
    Ok(Json(DataResponse { data: items }))
}
