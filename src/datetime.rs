//! Date/time utilities for cloudfs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format used for `lastModified` in directory listings.
///
/// ISO-8601 style with a numeric offset and no colon, e.g. `2024-01-15T19:30:00+0900`.
pub const MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format a DateTime<Utc> in the specified timezone.
///
/// # Arguments
///
/// * `dt` - DateTime in UTC
/// * `timezone` - Timezone name (e.g., "Asia/Tokyo", "UTC")
/// * `format` - chrono format string
///
/// Falls back to UTC when the timezone name does not parse.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    match timezone.parse::<Tz>() {
        Ok(tz) => dt.with_timezone(&tz).format(format).to_string(),
        Err(_) => dt.format(format).to_string(),
    }
}

/// Format a modification time for a listing entry.
pub fn format_modified(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, MODIFIED_FORMAT)
}

/// Whether `timezone` names a known IANA zone.
pub fn is_valid_timezone(timezone: &str) -> bool {
    timezone.parse::<Tz>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_format_modified_utc() {
        assert_eq!(format_modified(&sample(), "UTC"), "2024-01-15T10:30:00+0000");
    }

    #[test]
    fn test_format_modified_tokyo() {
        assert_eq!(
            format_modified(&sample(), "Asia/Tokyo"),
            "2024-01-15T19:30:00+0900"
        );
    }

    #[test]
    fn test_format_modified_negative_offset() {
        assert_eq!(
            format_modified(&sample(), "America/New_York"),
            "2024-01-15T05:30:00-0500"
        );
    }

    #[test]
    fn test_format_utc_datetime_invalid_timezone() {
        let result = format_utc_datetime(&sample(), "Invalid/Zone", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 10:30"); // Falls back to UTC format
    }

    #[test]
    fn test_is_valid_timezone() {
        assert!(is_valid_timezone("UTC"));
        assert!(is_valid_timezone("Europe/Berlin"));
        assert!(!is_valid_timezone("Mars/Olympus"));
    }
}
