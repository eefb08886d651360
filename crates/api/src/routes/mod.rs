pub mod auth;
pub mod categories;
pub mod health;
pub mod projects;
pub mod templates;
pub mod time_entries;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
///
/// /projects                      list, create
/// /projects/{id}/archive         archive
///
/// /categories                    list, create
/// /categories/{id}/deactivate    deactivate
///
/// /time-entries?from=&to=        list by date range
///
/// /templates                     list (paginated), create
/// /templates/{id}                get, update, delete
/// /templates/from-day/{day_id}   derive a template from a logged day
/// /templates/{id}/apply          materialize onto a date
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/categories", categories::router())
        .nest("/time-entries", time_entries::router())
        .nest("/templates", templates::router())
}
