//! Display formatting for backend timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats a backend timestamp for display in the local time zone.
///
/// Missing or empty input yields `None`. Input that cannot be parsed is
/// returned unchanged.
pub fn format_timestamp(timestamp: Option<&str>) -> Option<String> {
    let raw = timestamp.filter(|value| !value.is_empty())?;
    match parse_timestamp(raw) {
        Some(parsed) => Some(format_in_zone(&parsed.with_timezone(&Local))),
        None => Some(raw.to_string()),
    }
}

/// Parses RFC 3339 instants, zone-less date-times (taken as local time) and
/// bare dates (taken as UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn format_in_zone<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    value.format(DISPLAY_FORMAT).to_string()
}
