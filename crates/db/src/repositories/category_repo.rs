//! Repository for the `categories` table.

use sqlx::PgPool;
use timekeep_core::types::DbId;

use crate::models::category::{Category, CategoryRef, CreateCategory};

const COLUMNS: &str = "id, user_id, name, is_active, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category owned by `user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (user_id, name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's categories by name, optionally including inactive ones.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE user_id = $1 AND (is_active = true OR $2) \
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(user_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a category. Returns `true` if an active one was deactivated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET is_active = false, updated_at = now() \
             WHERE id = $1 AND is_active = true",
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
    ) -> Result<Vec<CategoryRef>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, CategoryRef>(
            "SELECT id, name, is_active FROM categories WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
