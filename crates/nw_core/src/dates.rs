use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Pattern tried when the value is not a full ISO-8601 timestamp.
const FALLBACK_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// Display format used by the HTML pages.
pub const DISPLAY_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Best-effort parse of a provider `publishedAt` value. Never fails, `None` marks
/// a missing or unreadable timestamp.
pub fn parse_published_at(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let normalized = match value.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => value.to_string(),
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed);
    }

    // Naive timestamps are taken as UTC.
    NaiveDateTime::parse_from_str(value, FALLBACK_PATTERN)
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

pub fn format_published_at(value: Option<&DateTime<FixedOffset>>) -> String {
    match value {
        Some(when) => when.format(DISPLAY_FORMAT).to_string(),
        None => "Unknown".to_string(),
    }
}
