//! Human-readable rendering of backend timestamps.

use chrono::{DateTime, NaiveDateTime};

/// Render an ISO-8601 timestamp as e.g. `March 4, 2024`.
///
/// Accepts RFC 3339 (`2024-03-04T10:00:00Z`, `...+02:00`) and the naive
/// `2024-03-04 10:00:00` form some databases emit. Anything else is returned
/// unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    const FORMAT: &str = "%B %-d, %Y";
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format(FORMAT).to_string();
        }
    }
    raw.to_owned()
}
