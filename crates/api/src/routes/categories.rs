//! Route definitions for the `/categories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes -- mounted at `/categories`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/{id}/deactivate", post(categories::deactivate_category))
}
