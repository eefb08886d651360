//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input via `timekeep_core`, delegate persistence to
//! the repositories in `timekeep_db`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod categories;
pub mod projects;
pub mod templates;
pub mod time_entries;
