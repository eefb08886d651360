/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Absolute timestamps are always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
