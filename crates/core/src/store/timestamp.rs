//! Timestamp encoding for stored rows.
//!
//! Timestamps are stored as RFC 3339 text in UTC with a fixed microsecond
//! precision and a `Z` suffix, so that string comparison in SQL agrees with
//! chronological order.

use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};

use crate::Error;

/// Encode a timestamp for storage.
pub fn format(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The current time, encoded for storage.
pub fn now() -> String {
    format(Utc::now())
}

/// Shift `at` by `by`, staying within the years the fixed-width encoding
/// can order (0000 through 9999).
///
/// Returns None on overflow or when the result leaves that range.
pub fn checked_offset(at: DateTime<Utc>, by: Duration) -> Option<DateTime<Utc>> {
    at.checked_add_signed(by)
        .filter(|shifted| (0..=9999).contains(&shifted.year()))
}

/// Decode a stored timestamp.
///
/// A value that does not parse means the row was written by something other
/// than this store.
pub fn parse(column: &str, value: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::StorageIntegrity(format!("invalid {column} timestamp {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_width_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format(at), "2024-01-02T03:04:05.000000Z");
    }

    #[test]
    fn test_lexical_order_matches_chronological_order() {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let later = base + Duration::microseconds(1);
        assert!(format(base) < format(later));
    }

    #[test]
    fn test_parse_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap() + Duration::microseconds(42);
        assert_eq!(parse("created_at", &format(at)).unwrap(), at);
    }

    #[test]
    fn test_parse_garbage_is_integrity_error() {
        let err = parse("updated_at", "yesterday").unwrap_err();
        assert!(matches!(err, Error::StorageIntegrity(msg) if msg.contains("updated_at")));
    }

    #[test]
    fn test_checked_offset_within_range() {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(checked_offset(base, Duration::hours(24)), Some(base + Duration::hours(24)));
        assert_eq!(checked_offset(base, Duration::seconds(-1)), Some(base - Duration::seconds(1)));

        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(checked_offset(last, Duration::zero()), Some(last));
    }

    #[test]
    fn test_checked_offset_out_of_range() {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert!(checked_offset(base, Duration::MAX).is_none());
        assert!(checked_offset(base, Duration::MIN).is_none());
        assert!(checked_offset(base, Duration::days(365 * 8000)).is_none());
        assert!(checked_offset(base, -Duration::days(365 * 2100)).is_none());
    }
}
