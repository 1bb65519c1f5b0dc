use crate::error::{CrawlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display format used for modification times everywhere in dirwatch.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Obsolete HTTP-date forms and the looser shapes some servers emit
const NAIVE_FORMATS: &[&str] = &[
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a `Last-Modified` header value into a timezone-naive UTC timestamp.
///
/// Accepts IMF-fixdate / RFC 2822, RFC 3339, RFC 850, asctime and plain
/// ISO dates. Anything else is a [`CrawlError::MalformedTimestamp`].
pub fn parse_last_modified(url: &str, value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(CrawlError::MalformedTimestamp {
        url: url.to_string(),
        value: value.to_string(),
    })
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_imf_fixdate() {
        let parsed = parse_last_modified("u", "Thu, 20 Sep 2018 17:04:11 GMT").unwrap();
        assert_eq!(parsed, at(2018, 9, 20, 17, 4, 11));
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let parsed = parse_last_modified("u", "Thu, 20 Sep 2018 10:04:11 -0700").unwrap();
        assert_eq!(parsed, at(2018, 9, 20, 17, 4, 11));
    }

    #[test]
    fn test_rfc3339() {
        let parsed = parse_last_modified("u", "2020-01-01T12:30:00+01:00").unwrap();
        assert_eq!(parsed, at(2020, 1, 1, 11, 30, 0));
    }

    #[test]
    fn test_rfc850() {
        let parsed = parse_last_modified("u", "Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
        assert_eq!(parsed, at(1994, 11, 6, 8, 49, 37));
    }

    #[test]
    fn test_asctime() {
        let parsed = parse_last_modified("u", "Wed Nov 16 08:49:37 1994").unwrap();
        assert_eq!(parsed, at(1994, 11, 16, 8, 49, 37));
    }

    #[test]
    fn test_bare_date() {
        let parsed = parse_last_modified("u", "2020-01-01").unwrap();
        assert_eq!(parsed, at(2020, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(parse_last_modified("u", "  2020-01-01 ").is_ok());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_last_modified("http://h/x", "yesterday-ish").unwrap_err();
        match err {
            CrawlError::MalformedTimestamp { url, value } => {
                assert_eq!(url, "http://h/x");
                assert_eq!(value, "yesterday-ish");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&at(2018, 9, 20, 7, 5, 0)), "2018-09-20 07:05:00");
    }
}
