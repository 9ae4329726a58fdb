//! Identity and time primitives.

use chrono::{DateTime, Utc};

/// Note identifier. Assigned by the store on insert and never reused.
pub type NoteId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Current wall-clock time in UTC.
pub fn now() -> Timestamp {
    Utc::now()
}
