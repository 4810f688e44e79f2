//! Date helper functions

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Format a date the way the site displays it ("January 5, 2024")
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a timestamp as a display date
pub fn format_datetime<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_date(&date.date_naive())
}

/// Format a timestamp in W3C datetime form (sitemaps, `<time datetime>`)
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Parse a CMS timestamp; accepts RFC 3339 or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(&date), "January 5, 2024");
        let date = NaiveDate::from_ymd_opt(2023, 11, 30).unwrap();
        assert_eq!(format_date(&date), "November 30, 2023");
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-03-01T10:15:00.000Z").unwrap();
        assert_eq!(date_xml(&ts), "2024-03-01T10:15:00+00:00");
        let day = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(format_datetime(&day), "March 1, 2024");
        assert!(parse_timestamp("not a date").is_none());
    }
}
