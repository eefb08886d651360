//! Route definitions for the `/time-entries` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::time_entries;
use crate::state::AppState;

/// Time-entry routes -- mounted at `/time-entries`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(time_entries::list_time_entries))
}
