//! Repository for the `templates` and `template_entries` tables.
//!
//! Template writes are parent + children in one transaction: a failing
//! entry insert (bad project/category reference, say) rolls back the
//! template row with it. Entry sets are only ever replaced wholesale, with
//! `sort_order` reassigned from array position, so stored orders stay dense
//! and zero-based.

use sqlx::{PgPool, Postgres, Transaction};
use timekeep_core::types::DbId;

use crate::models::template::{
    CreateTemplate, Template, TemplateEntry, TemplateEntryInput, TemplateWithEntries,
    UpdateTemplate,
};

const COLUMNS: &str = "id, user_id, name, description, created_at, updated_at";

const ENTRY_COLUMNS: &str = "id, template_id, start_time, end_time, project_id, \
     category_id, description, sort_order";

/// Provides CRUD operations for templates and their entries.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Count templates owned by a user (pagination total).
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List one page of a user's templates, ordered by name ascending.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE user_id = $1 \
             ORDER BY name ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch the entries for a set of templates, ordered so callers can
    /// group them by `template_id` with entries already in `sort_order`.
    pub async fn list_entries_for_templates(
        pool: &PgPool,
        template_ids: &[DbId],
    ) -> Result<Vec<TemplateEntry>, sqlx::Error> {
        if template_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM template_entries \
             WHERE template_id = ANY($1) \
             ORDER BY template_id ASC, sort_order ASC"
        );
        sqlx::query_as::<_, TemplateEntry>(&query)
            .bind(template_ids)
            .fetch_all(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a template's entries sorted by `sort_order`.
    pub async fn list_entries(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM template_entries \
             WHERE template_id = $1 \
             ORDER BY sort_order ASC"
        );
        sqlx::query_as::<_, TemplateEntry>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a template together with its entries.
    ///
    /// Runs in a transaction: if any entry insert fails, the template row
    /// rolls back with it.
    pub async fn create_with_entries(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTemplate,
    ) -> Result<TemplateWithEntries, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO templates (user_id, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let template = sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        let entries = insert_entries(&mut tx, template.id, &input.entries).await?;

        tx.commit().await?;
        Ok(TemplateWithEntries { template, entries })
    }

    /// Patch a template's metadata and, when `entries` is provided, replace
    /// the entire entry set.
    ///
    /// Runs in a transaction. Returns `None` if the template does not
    /// exist. Entries are never merged or diffed: the existing set is
    /// deleted and the provided one inserted with fresh sort orders.
    pub async fn update_with_entries(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<TemplateWithEntries>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE templates SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let template = match sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?
        {
            Some(t) => t,
            None => return Ok(None),
        };

        let entries = match &input.entries {
            Some(replacement) => {
                sqlx::query("DELETE FROM template_entries WHERE template_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_entries(&mut tx, id, replacement).await?
            }
            None => {
                let query = format!(
                    "SELECT {ENTRY_COLUMNS} FROM template_entries \
                     WHERE template_id = $1 \
                     ORDER BY sort_order ASC"
                );
                sqlx::query_as::<_, TemplateEntry>(&query)
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(Some(TemplateWithEntries { template, entries }))
    }

    /// Hard-delete a template. Entries cascade via the foreign key.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Insert an entry set for `template_id` with `sort_order` = array index.
async fn insert_entries(
    tx: &mut Transaction<'_, Postgres>,
    template_id: DbId,
    inputs: &[TemplateEntryInput],
) -> Result<Vec<TemplateEntry>, sqlx::Error> {
    let query = format!(
        "INSERT INTO template_entries \
            (template_id, start_time, end_time, project_id, category_id, \
             description, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {ENTRY_COLUMNS}"
    );

    let mut entries = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let entry = sqlx::query_as::<_, TemplateEntry>(&query)
            .bind(template_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.project_id)
            .bind(input.category_id)
            .bind(&input.description)
            .bind(index as i32)
            .fetch_one(&mut **tx)
            .await?;
        entries.push(entry);
    }
    Ok(entries)
}
