//! Timestamp helpers shared by every entity.

use chrono::{DateTime, Utc};

/// Current wall-clock time in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Timestamp for a mutation of a record last touched at `previous`.
///
/// Never goes backwards, even if the wall clock does.
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous)
}
