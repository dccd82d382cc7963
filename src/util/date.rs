use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A date field as found in a feed.
///
/// Feeds are notoriously loose about date formats, so a value that does
/// not parse is kept as the original string instead of being discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateValue {
    Parsed(DateTime<FixedOffset>),
    Raw(String),
}

impl DateValue {
    /// Parses `value`, keeping the trimmed original text if no known
    /// format matches.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match parse_datetime(value) {
            Some(dt) => DateValue::Parsed(dt),
            None => {
                tracing::trace!(value, "Keeping unparsable date as text");
                DateValue::Raw(value.to_string())
            }
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            DateValue::Parsed(dt) => Some(dt),
            DateValue::Raw(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, DateValue::Parsed(_))
    }
}

impl std::fmt::Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateValue::Parsed(dt) => write!(f, "{}", dt.to_rfc3339()),
            DateValue::Raw(s) => f.write_str(s),
        }
    }
}

/// Tries the formats seen in the wild, most specific first:
///
/// - RFC 3339 (Atom, Dublin Core)
/// - RFC 2822, including obsolete zone names and two-digit years (RSS)
/// - ISO 8601 without seconds, e.g. `2005-08-20T22:11-05:00`
/// - ISO 8601 without an offset (assumed UTC)
/// - A bare `YYYY-MM-DD` (midnight UTC)
fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(&value.replace('Z', "+00:00"), "%Y-%m-%dT%H:%M%:z") {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_local_timezone(utc).single()?);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0)?.and_local_timezone(utc).single();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parsed(value: &str) -> DateTime<FixedOffset> {
        match DateValue::parse(value) {
            DateValue::Parsed(dt) => dt,
            DateValue::Raw(s) => panic!("expected {s:?} to parse"),
        }
    }

    #[test]
    fn test_rfc3339() {
        let dt = parsed("2005-08-20T21:14:38Z");
        assert_eq!(dt.format("%F %T").to_string(), "2005-08-20 21:14:38");
        let dt = parsed("2006-03-29T07:35:59.000Z");
        assert_eq!(dt.hour(), 7);
    }

    #[test]
    fn test_rfc2822_with_named_zone() {
        let dt = parsed("Sat, 07 Sep 2002 00:01:02 EDT");
        assert_eq!((dt.day(), dt.month()), (7, 9));
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_rfc2822_two_digit_year() {
        let dt = parsed("Sat, 7 Sep 02 13:14:15 -0600");
        assert_eq!((dt.year(), dt.month(), dt.day()), (2002, 9, 7));
    }

    #[test]
    fn test_iso_without_seconds() {
        let dt = parsed("2005-08-20T22:11-05:00");
        let expected = DateTime::parse_from_rfc3339("2005-08-20T22:11:00-05:00").unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_bare_date() {
        let dt = parsed("2002-09-07");
        assert_eq!((dt.year(), dt.hour()), (2002, 0));
    }

    #[test]
    fn test_unparsable_kept_as_text() {
        let value = DateValue::parse("  sometime last week ");
        assert_eq!(value, DateValue::Raw("sometime last week".to_string()));
        assert!(!value.is_parsed());
        assert_eq!(value.to_string(), "sometime last week");
    }
}
