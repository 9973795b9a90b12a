//! Event date formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Pattern used when the form has never been edited.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY/MM/DD";

const DATE_INPUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_INPUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse the date shapes a date picker or a user typing by hand produces.
///
/// Date-times keep the calendar date as written; no timezone shifting.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = DATE_INPUTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Render `raw` through `pattern`, substituting `YYYY`, `MM` and `DD`.
///
/// Empty input renders as an empty line; input that does not parse as a
/// date is passed through unchanged.
#[must_use]
pub fn format_date(raw: &str, pattern: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let Some(date) = parse_event_date(raw) else {
        tracing::debug!(input = raw, "date did not parse; passing through");
        return raw.to_string();
    };

    pattern
        .replace("YYYY", &date.year().to_string())
        .replace("MM", &format!("{:02}", date.month()))
        .replace("DD", &format!("{:02}", date.day()))
}
