//! Repository for the `time_entries` table.

use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::PgPool;
use timekeep_core::types::{DbId, Timestamp};

use crate::models::time_entry::{
    CreateTimeEntry, EntryMode, NewBlockEntry, NewDayEntry, TimeEntry,
};

const COLUMNS: &str = "id, user_id, parent_id, start_time, end_time, \
     duration_minutes, project_id, category_id, description, entry_mode, \
     created_at, updated_at";

/// The conflict window for a date: `[00:00:00.000Z, 23:59:59.999Z]`.
fn day_window(date: NaiveDate) -> (Timestamp, Timestamp) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::milliseconds(86_399_999))
}

/// Provides time-entry persistence, including the transactional
/// day-with-blocks insert used by template application.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// Insert a single time entry (used by direct entry paths and tests).
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTimeEntry,
    ) -> Result<TimeEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_entries \
                (user_id, parent_id, start_time, end_time, duration_minutes, \
                 project_id, category_id, description, entry_mode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(user_id)
            .bind(input.parent_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.duration_minutes)
            .bind(input.project_id)
            .bind(input.category_id)
            .bind(&input.description)
            .bind(input.entry_mode)
            .fetch_one(pool)
            .await
    }

    /// Find a time entry by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_entries WHERE id = $1");
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the child blocks of a day entry, earliest first.
    pub async fn list_blocks(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries \
             WHERE parent_id = $1 \
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Count a user's top-level entries whose start falls on the given UTC
    /// date. A non-zero count means the date is already booked.
    pub async fn count_top_level_on_date(
        pool: &PgPool,
        user_id: DbId,
        date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let (window_start, window_end) = day_window(date);
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM time_entries \
             WHERE user_id = $1 \
               AND parent_id IS NULL \
               AND start_time >= $2 \
               AND start_time <= $3",
        )
        .bind(user_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List a user's entries (days and blocks) starting within the
    /// inclusive `[from, to]` date range, earliest first.
    pub async fn list_for_user_between(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let (window_start, _) = day_window(from);
        let (_, window_end) = day_window(to);
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries \
             WHERE user_id = $1 \
               AND start_time >= $2 \
               AND start_time <= $3 \
             ORDER BY start_time ASC"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(user_id)
            .bind(window_start)
            .bind(window_end)
            .fetch_all(pool)
            .await
    }

    /// Insert a day entry plus its blocks, all tagged
    /// [`EntryMode::Template`], in one transaction.
    ///
    /// A failing block insert rolls the day row back with it, so a
    /// childless day can never be left behind. The partial unique index on
    /// `(user_id, entry_date)` also fires inside this transaction, which is
    /// what stops two concurrent applications of the same date.
    pub async fn create_day_with_blocks(
        pool: &PgPool,
        user_id: DbId,
        day: &NewDayEntry,
        blocks: &[NewBlockEntry],
    ) -> Result<(TimeEntry, Vec<TimeEntry>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let day_query = format!(
            "INSERT INTO time_entries \
                (user_id, parent_id, start_time, end_time, duration_minutes, \
                 entry_mode) \
             VALUES ($1, NULL, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let day_row = sqlx::query_as::<_, TimeEntry>(&day_query)
            .bind(user_id)
            .bind(day.start_time)
            .bind(day.end_time)
            .bind(day.duration_minutes)
            .bind(EntryMode::Template)
            .fetch_one(&mut *tx)
            .await?;

        let block_query = format!(
            "INSERT INTO time_entries \
                (user_id, parent_id, start_time, end_time, duration_minutes, \
                 project_id, category_id, description, entry_mode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let mut block_rows = Vec::with_capacity(blocks.len());
        for block in blocks {
            let row = sqlx::query_as::<_, TimeEntry>(&block_query)
                .bind(user_id)
                .bind(day_row.id)
                .bind(block.start_time)
                .bind(block.end_time)
                .bind(block.duration_minutes)
                .bind(block.project_id)
                .bind(block.category_id)
                .bind(&block.description)
                .bind(EntryMode::Template)
                .fetch_one(&mut *tx)
                .await?;
            block_rows.push(row);
        }

        tx.commit().await?;
        Ok((day_row, block_rows))
    }
}
