//! `Date` header parsing with a chain of fallback formats.
//!
//! Real-world headers are messy: weekday omitted, trailing zone comments
//! such as `(PST)`, or a bare zone abbreviation instead of a numeric offset.
//! Each format is tried in order; exhausting the chain yields `None`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Zone comments stripped before the third attempt.
const ZONE_COMMENTS: [&str; 5] = [" (UTC)", " (PST)", " (PDT)", " (CET)", " (CEST)"];

/// Zone abbreviations accepted in place of a numeric offset (RFC 1123 style).
const ZONE_NAMES: [(&str, i32); 10] = [
    ("GMT", 0),
    ("UTC", 0),
    ("UT", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("PST", -8),
    ("PDT", -7),
];

/// Parse a `Date` header value.
pub fn parse_header_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date);
    }

    // "Mon, 2 Jan 2006 15:04:05 -0700 (MST)"
    if let Some(stripped) = strip_trailing_comment(value) {
        if let Ok(date) = DateTime::parse_from_str(stripped, "%a, %d %b %Y %H:%M:%S %z") {
            return Some(date);
        }
    }

    // "2 Jan 2006 15:04:05 -0700"
    if let Ok(date) = DateTime::parse_from_str(value, "%d %b %Y %H:%M:%S %z") {
        return Some(date);
    }

    let without_zones = ZONE_COMMENTS
        .iter()
        .fold(value.to_string(), |acc, zone| acc.replace(zone, ""));
    if let Ok(date) = DateTime::parse_from_str(&without_zones, "%a, %d %b %Y %H:%M:%S %z") {
        return Some(date);
    }

    // "Mon, 02 Jan 2006 15:04:05 GMT"
    if let Some(date) = parse_with_zone_name(value) {
        return Some(date);
    }

    tracing::warn!(date = value, "could not parse date header");
    None
}

fn strip_trailing_comment(value: &str) -> Option<&str> {
    if !value.ends_with(')') {
        return None;
    }
    value.rfind(" (").map(|idx| &value[..idx])
}

fn parse_with_zone_name(value: &str) -> Option<DateTime<FixedOffset>> {
    let (stamp, zone) = value.rsplit_once(' ')?;
    let hours = ZONE_NAMES
        .iter()
        .find(|(name, _)| *name == zone)
        .map(|(_, hours)| *hours)?;
    let offset = FixedOffset::east_opt(hours * 3600)?;
    let naive = NaiveDateTime::parse_from_str(stamp, "%a, %d %b %Y %H:%M:%S").ok()?;
    offset.from_local_datetime(&naive).single()
}
