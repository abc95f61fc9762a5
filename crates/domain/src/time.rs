//! Time and timestamp helpers.

use chrono::{DateTime, NaiveTime, Utc};

/// UTC timestamp used for event times and snapshot bookkeeping.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a wall-clock time of day, accepting `HH:MM` and `HH:MM:SS`.
///
/// Returns `None` for anything else (empty strings, out-of-range fields, …).
#[must_use]
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
