//! Route definitions for the `/templates` resource.
//!
//! ```text
//! GET    /                       list_templates (paginated)
//! POST   /                       create_template
//! GET    /{id}                   get_template
//! PUT    /{id}                   update_template
//! DELETE /{id}                   delete_template
//! POST   /from-day/{day_id}      create_from_day
//! POST   /{id}/apply             apply_template
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes -- mounted at `/templates`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/from-day/{day_id}", post(templates::create_from_day))
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/{id}/apply", post(templates::apply_template))
}
