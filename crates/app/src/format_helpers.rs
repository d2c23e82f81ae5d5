//! Shared formatting utilities for the UI layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// "Jan 20, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Jan 20, 2026 9:35 PM" in UTC.
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %-I:%M %p").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "No due date".to_string())
}

/// Human-readable byte count: "512 B", "4.0 KB", "2.5 MB".
pub fn format_file_size(bytes: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes.max(0) as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Parse a `<input type="date">` value; blank means unset.
pub fn parse_date_input(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| "Enter a valid date".to_string())
}

/// Parse a `<input type="datetime-local">` value as UTC; blank means unset.
pub fn parse_datetime_input(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| Some(dt.and_utc()))
        .map_err(|_| "Enter a valid date and time".to_string())
}

/// Trimmed text, `None` when blank.
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
