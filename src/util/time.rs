use chrono::{SecondsFormat, Utc};

/// Current time as a fixed-width RFC3339 string (millisecond precision,
/// `Z` suffix). Fixed width keeps lexicographic order equal to
/// chronological order, which the createdAt-descending sorts rely on.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
