//! Relative wall-clock time handling.
//!
//! Template entries carry date-independent `HH:MM` times. Applying a
//! template pins those times onto a concrete calendar date, always
//! interpreted in UTC: deployments are single-timezone and relative times
//! are UTC by definition, so `09:00` on `2025-01-15` is exactly
//! `2025-01-15T09:00:00.000Z`. Stored time columns may carry seconds
//! (`HH:MM:SS`); everything leaving this module is truncated to the minute.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use crate::error::CoreError;

/// Wire format for relative times.
pub const HHMM_FORMAT: &str = "%H:%M";

/// Storage format for relative times (TIME columns render with seconds).
pub const HHMMSS_FORMAT: &str = "%H:%M:%S";

/// Convert a relative wall-clock time plus a calendar date into an absolute
/// UTC instant. Seconds and subseconds are zeroed.
pub fn to_absolute(time: NaiveTime, date: NaiveDate) -> DateTime<Utc> {
    date.and_time(truncate_to_minute(time)).and_utc()
}

/// Reduce an absolute UTC instant back to its relative `HH:MM` component.
pub fn to_relative(instant: DateTime<Utc>) -> NaiveTime {
    truncate_to_minute(instant.time())
}

/// Difference between two instants in minutes, rounded to the nearest
/// minute.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

/// Parse a relative time from its `HH:MM` wire form, also accepting the
/// `HH:MM:SS` storage form (seconds are dropped).
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value, HHMM_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, HHMMSS_FORMAT))
        .map(truncate_to_minute)
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid time '{value}'. Expected HH:MM (24-hour)"
            ))
        })
}

/// Format a relative time in its `HH:MM` wire form.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(HHMM_FORMAT).to_string()
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    // with_second(0) only fails for leap-second times; fall back to the
    // original value rather than panic.
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Serde adapter for `NaiveTime` fields that cross the wire as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(de)?;
        super::parse_hhmm(&raw).map_err(|e| D::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    // --- to_absolute ---

    #[test]
    fn to_absolute_pins_wall_clock_to_utc() {
        let instant = to_absolute(parse_hhmm("09:00").unwrap(), date("2025-01-15"));
        assert_eq!(
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2025-01-15T09:00:00.000Z"
        );
    }

    #[test]
    fn to_absolute_midnight_is_start_of_day() {
        let instant = to_absolute(parse_hhmm("00:00").unwrap(), date("2025-06-01"));
        assert_eq!(
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2025-06-01T00:00:00.000Z"
        );
    }

    #[test]
    fn to_absolute_end_of_day_does_not_roll_over() {
        let instant = to_absolute(parse_hhmm("23:59").unwrap(), date("2025-12-31"));
        assert_eq!(
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2025-12-31T23:59:00.000Z"
        );
    }

    #[test]
    fn to_absolute_round_trips_components() {
        let time = parse_hhmm("13:45").unwrap();
        let d = date("2024-02-29");
        let instant = to_absolute(time, d);
        assert_eq!(instant.date_naive(), d);
        assert_eq!(to_relative(instant), time);
    }

    // --- to_relative ---

    #[test]
    fn to_relative_extracts_utc_hour_and_minute() {
        let instant: DateTime<Utc> = "2025-01-15T08:30:00Z".parse().unwrap();
        assert_eq!(format_hhmm(to_relative(instant)), "08:30");
    }

    #[test]
    fn to_relative_drops_seconds() {
        let instant: DateTime<Utc> = "2025-01-15T08:30:59Z".parse().unwrap();
        assert_eq!(format_hhmm(to_relative(instant)), "08:30");
    }

    // --- duration_minutes ---

    #[test]
    fn duration_minutes_whole_hours() {
        let start: DateTime<Utc> = "2025-01-15T09:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2025-01-15T17:00:00Z".parse().unwrap();
        assert_eq!(duration_minutes(start, end), 480);
    }

    #[test]
    fn duration_minutes_rounds_to_nearest_minute() {
        let start: DateTime<Utc> = "2025-01-15T09:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2025-01-15T09:30:31Z".parse().unwrap();
        assert_eq!(duration_minutes(start, end), 31);

        let end: DateTime<Utc> = "2025-01-15T09:30:29Z".parse().unwrap();
        assert_eq!(duration_minutes(start, end), 30);
    }

    #[test]
    fn duration_minutes_zero_for_equal_instants() {
        let t: DateTime<Utc> = "2025-01-15T09:00:00Z".parse().unwrap();
        assert_eq!(duration_minutes(t, t), 0);
    }

    // --- parse / format ---

    #[test]
    fn parse_accepts_wire_and_storage_forms() {
        assert_eq!(format_hhmm(parse_hhmm("09:00").unwrap()), "09:00");
        assert_eq!(format_hhmm(parse_hhmm("09:00:00").unwrap()), "09:00");
        assert_eq!(format_hhmm(parse_hhmm("23:59:59").unwrap()), "23:59");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn hhmm_serde_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "super::hhmm")]
            t: NaiveTime,
        }

        let w: Wrapper = serde_json::from_str(r#"{"t":"07:15"}"#).unwrap();
        assert_eq!(format_hhmm(w.t), "07:15");
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"t":"07:15"}"#);
    }
}
