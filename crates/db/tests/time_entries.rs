//! Integration tests for the time-entry repository:
//! - Transactional day+blocks insert and rollback
//! - The per-(user, date) uniqueness of top-level entries
//! - Conflict-window counting
//! - Block ordering

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;
use timekeep_core::types::Timestamp;
use timekeep_db::models::time_entry::{
    CreateTimeEntry, EntryMode, NewBlockEntry, NewDayEntry,
};
use timekeep_db::models::user::CreateUser;
use timekeep_db::repositories::{TimeEntryRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.test"),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .expect("user insert should succeed")
    .id
}

fn ts(s: &str) -> Timestamp {
    s.parse().expect("valid timestamp")
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

fn day(start: &str, end: &str, duration_minutes: i32) -> NewDayEntry {
    NewDayEntry {
        start_time: ts(start),
        end_time: ts(end),
        duration_minutes,
    }
}

fn block(start: &str, end: &str, duration_minutes: i32) -> NewBlockEntry {
    NewBlockEntry {
        start_time: ts(start),
        end_time: ts(end),
        duration_minutes,
        project_id: None,
        category_id: None,
        description: None,
    }
}

// ---------------------------------------------------------------------------
// Day + blocks insert
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn day_with_blocks_creates_parent_and_children(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    let (day_row, blocks) = TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T09:00:00Z", "2025-01-15T17:00:00Z", 480),
        &[
            block("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180),
            block("2025-01-15T13:00:00Z", "2025-01-15T17:00:00Z", 240),
        ],
    )
    .await
    .expect("insert should succeed");

    assert_eq!(day_row.parent_id, None);
    assert_eq!(day_row.entry_mode, EntryMode::Template);
    assert_eq!(day_row.duration_minutes, 480);

    assert_eq!(blocks.len(), 2);
    for b in &blocks {
        assert_eq!(b.parent_id, Some(day_row.id));
        assert_eq!(b.entry_mode, EntryMode::Template);
    }
}

#[sqlx::test]
async fn failed_block_insert_rolls_back_the_day(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    let mut bad = block("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180);
    bad.project_id = Some(999_999); // no such project

    let err = TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180),
        &[bad],
    )
    .await
    .expect_err("foreign key violation expected");

    assert_matches!(err, sqlx::Error::Database(_));
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23503")
    );

    // The day row must not survive the failed block insert.
    let count = TimeEntryRepo::count_top_level_on_date(&pool, user_id, date("2025-01-15"))
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn second_day_on_same_date_violates_uniqueness(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180),
        &[block("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180)],
    )
    .await
    .expect("first insert should succeed");

    let err = TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T13:00:00Z", "2025-01-15T14:00:00Z", 60),
        &[block("2025-01-15T13:00:00Z", "2025-01-15T14:00:00Z", 60)],
    )
    .await
    .expect_err("unique violation expected");

    let db_err = err.as_database_error().expect("database error expected");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_time_entries_user_day"));
}

#[sqlx::test]
async fn different_users_can_book_the_same_date(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    for user_id in [alice, bob] {
        TimeEntryRepo::create_day_with_blocks(
            &pool,
            user_id,
            &day("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180),
            &[block("2025-01-15T09:00:00Z", "2025-01-15T12:00:00Z", 180)],
        )
        .await
        .expect("insert should succeed");
    }
}

// ---------------------------------------------------------------------------
// Conflict window
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn conflict_count_only_sees_top_level_rows_on_the_date(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    let (day_row, _) = TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T23:59:00Z", "2025-01-15T23:59:30Z", 1),
        &[block("2025-01-15T23:59:00Z", "2025-01-15T23:59:30Z", 1)],
    )
    .await
    .unwrap();

    // The 23:59 start still falls inside the day window.
    let count = TimeEntryRepo::count_top_level_on_date(&pool, user_id, date("2025-01-15"))
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Blocks (children) never count, and neither do other dates or users.
    let blocks = TimeEntryRepo::list_blocks(&pool, day_row.id).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        TimeEntryRepo::count_top_level_on_date(&pool, user_id, date("2025-01-16"))
            .await
            .unwrap(),
        0
    );
    let stranger = seed_user(&pool, "bob").await;
    assert_eq!(
        TimeEntryRepo::count_top_level_on_date(&pool, stranger, date("2025-01-15"))
            .await
            .unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn blocks_list_in_chronological_order(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    let (day_row, _) = TimeEntryRepo::create_day_with_blocks(
        &pool,
        user_id,
        &day("2025-01-15T08:00:00Z", "2025-01-15T17:00:00Z", 540),
        &[
            block("2025-01-15T13:00:00Z", "2025-01-15T17:00:00Z", 240),
            block("2025-01-15T08:00:00Z", "2025-01-15T12:00:00Z", 240),
        ],
    )
    .await
    .unwrap();

    let blocks = TimeEntryRepo::list_blocks(&pool, day_row.id).await.unwrap();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].start_time < blocks[1].start_time);
}

#[sqlx::test]
async fn range_listing_is_inclusive_and_ordered(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;

    for (start, end) in [
        ("2025-01-14T10:00:00Z", "2025-01-14T11:00:00Z"),
        ("2025-01-15T10:00:00Z", "2025-01-15T11:00:00Z"),
        ("2025-01-17T10:00:00Z", "2025-01-17T11:00:00Z"),
    ] {
        TimeEntryRepo::create(
            &pool,
            user_id,
            &CreateTimeEntry {
                parent_id: None,
                start_time: ts(start),
                end_time: ts(end),
                duration_minutes: 60,
                project_id: None,
                category_id: None,
                description: None,
                entry_mode: EntryMode::Simple,
            },
        )
        .await
        .unwrap();
    }

    let listed = TimeEntryRepo::list_for_user_between(
        &pool,
        user_id,
        date("2025-01-14"),
        date("2025-01-15"),
    )
    .await
    .unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed[0].start_time < listed[1].start_time);
}
