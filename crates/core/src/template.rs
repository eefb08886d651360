//! Template field validation.
//!
//! Length limits and time-ordering checks shared by the create and update
//! paths. Reference validation lives in [`crate::apply`] because it is part
//! of the application pipeline, not input validation.

use chrono::NaiveTime;

use crate::error::CoreError;

/// Maximum length for a template name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for a template description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validate a template name: non-empty (after trimming) and within the
/// length limit.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Template name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Template name too long: {} chars (max {MAX_NAME_LEN})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate a template description against the length limit.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Template description too long: {} chars (max {MAX_DESCRIPTION_LEN})",
            description.len()
        )));
    }
    Ok(())
}

/// Validate that an entry's end time comes after its start time.
///
/// Relative entries are date-free, so a block cannot cross midnight; an
/// end at or before the start would materialize with a non-positive
/// duration.
pub fn validate_entry_times(
    entry_index: usize,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), CoreError> {
    if end_time <= start_time {
        return Err(CoreError::Validation(format!(
            "Entry {entry_index}: end time must be after start time"
        )));
    }
    Ok(())
}
