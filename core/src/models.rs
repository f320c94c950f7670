mod note;

pub use note::Note;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Timestamp format used for the `created_at` column, e.g. `2024/01/01 10:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format a point in time as a `created_at` string.
pub fn format_timestamp(datetime: &DateTime<Local>) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `created_at` string back into a point in time.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}
