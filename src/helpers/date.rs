//! Date formatting helpers

use chrono::{DateTime, TimeZone};

/// Format a date for display the way the feed shows it, e.g. "Jan 15, 2026"
/// for English locales and ISO otherwise.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, lang: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if lang.starts_with("en") {
        format!(
            "{} {}, {}",
            date.format("%b"),
            date.format("%-d"),
            date.format("%Y")
        )
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// RFC 3339 timestamp for feeds and time tags
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc3339()
}
