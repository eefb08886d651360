//! Model structs and DTOs.
//!
//! Each submodule carries:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where patching exists
//!
//! Everything that crosses the HTTP boundary serializes camelCase; relative
//! times serialize as `HH:MM` via `timekeep_core::wallclock::hhmm`.

pub mod category;
pub mod project;
pub mod session;
pub mod template;
pub mod time_entry;
pub mod user;
