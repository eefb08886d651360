use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use timekeep_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP/database-specific
/// variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON error bodies, with a `details` object where a
/// payload is part of the contract (`DATE_HAS_ENTRIES`).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `timekeep_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Day/block insertion failed during template application.
    #[error("Create failed: {0}")]
    CreateFailed(sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::TemplateEmpty { .. } => (
                    StatusCode::BAD_REQUEST,
                    "TEMPLATE_EMPTY",
                    "Template has no entries to apply".to_string(),
                ),
                CoreError::DateHasEntries {
                    date,
                    existing_entries_count,
                } => {
                    details = Some(json!({
                        "date": date.to_string(),
                        "existingEntriesCount": existing_entries_count,
                    }));
                    (
                        StatusCode::BAD_REQUEST,
                        "DATE_HAS_ENTRIES",
                        format!("Date {date} already has time entries"),
                    )
                }
                CoreError::NotDayModeEntry { entry_id } => (
                    StatusCode::BAD_REQUEST,
                    "NOT_DAY_MODE_ENTRY",
                    format!("Time entry {entry_id} is not a top-level day entry"),
                ),
                CoreError::NoBlocks { entry_id } => (
                    StatusCode::BAD_REQUEST,
                    "NO_BLOCKS",
                    format!("Time entry {entry_id} has no blocks"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Template application insert failures ---
            AppError::CreateFailed(err) => {
                if is_day_uniqueness_violation(err) {
                    (
                        StatusCode::BAD_REQUEST,
                        "DATE_HAS_ENTRIES",
                        "Date already has time entries".to_string(),
                    )
                } else {
                    tracing::error!(error = %err, "Template application insert failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CREATE_FAILED",
                        "Failed to create time entries from template".to_string(),
                    )
                }
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// True when `err` is the partial unique index guarding one top-level entry
/// set per (user, UTC day).
fn is_day_uniqueness_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.constraint() == Some("uq_time_entries_user_day"))
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign-key violations (code 23503) are attributed to the offending
///   column: project constraints map to `INVALID_PROJECT_ID`, category
///   constraints to `INVALID_CATEGORY_ID`.
/// - The day-uniqueness index maps to `DATE_HAS_ENTRIES`; other unique
///   constraint violations (names starting `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");

            // PostgreSQL foreign key violation: error code 23503.
            if db_err.code().as_deref() == Some("23503") {
                if constraint.contains("project") {
                    return (
                        StatusCode::BAD_REQUEST,
                        "INVALID_PROJECT_ID",
                        "Referenced project does not exist".to_string(),
                    );
                }
                if constraint.contains("category") {
                    return (
                        StatusCode::BAD_REQUEST,
                        "INVALID_CATEGORY_ID",
                        "Referenced category does not exist".to_string(),
                    );
                }
            }

            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                if constraint == "uq_time_entries_user_day" {
                    return (
                        StatusCode::BAD_REQUEST,
                        "DATE_HAS_ENTRIES",
                        "Date already has time entries".to_string(),
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }

            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            )
        }
    }
}
