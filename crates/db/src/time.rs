//! Timestamp text encoding.
//!
//! Timestamps persist as fixed-width RFC 3339 UTC text
//! ("2026-08-01T09:30:00.000000Z"). The fixed width keeps SQL string
//! comparisons (`updated_at > synced_at`) equivalent to time comparisons.

use chrono::{DateTime, SecondsFormat, Utc};
use shared::StorageError;

pub const EPOCH_TEXT: &str = "1970-01-01T00:00:00.000000Z";

pub fn fmt_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_ts(text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StorageError::schema(format!("bad timestamp {text:?}: {err}")))
}

pub fn parse_opt_ts(text: Option<&str>) -> Result<Option<DateTime<Utc>>, StorageError> {
    text.map(parse_ts).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_stays_fixed_width() {
        let now = Utc::now();
        let text = fmt_ts(now);
        assert_eq!(text.len(), EPOCH_TEXT.len());
        let parsed = parse_ts(&text).unwrap();
        assert!((now - parsed).num_microseconds().unwrap().abs() < 2);
    }

    #[test]
    fn lexicographic_order_matches_time_order() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(90);
        assert!(fmt_ts(earlier) < fmt_ts(later));
        assert!(EPOCH_TEXT < fmt_ts(earlier).as_str());
    }

    #[test]
    fn garbage_is_a_schema_mismatch() {
        assert!(parse_ts("yesterday").is_err());
    }
}
