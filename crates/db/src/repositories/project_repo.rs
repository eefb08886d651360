//! Repository for the `projects` table.

use sqlx::PgPool;
use timekeep_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectRef};

const COLUMNS: &str = "id, user_id, name, is_archived, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects by name, optionally including archived ones.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        include_archived: bool,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE user_id = $1 AND (is_archived = false OR $2) \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(include_archived)
            .fetch_all(pool)
            .await
    }

    /// Archive a project. Returns `true` if a live project was archived.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET is_archived = true, updated_at = now() \
             WHERE id = $1 AND is_archived = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Batch-fetch reference projections for the given ids.
    ///
    /// Skips the query entirely for an empty id set.
    pub async fn find_refs(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ProjectRef>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProjectRef>(
            "SELECT id, name, is_archived FROM projects WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
