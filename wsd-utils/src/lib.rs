//! Shared utility functions for WSD crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Datelike, NaiveDate};

    /// ISO calendar format used for every date we emit.
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Accepted input layouts, tried in order after any time-of-day suffix is dropped.
    const INPUT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, ISO_FORMAT)?)
    }

    /// Parse a calendar date the way spreadsheet exports tend to write them.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY` and `YYYYMMDD`, each
    /// optionally followed by a time of day (`2015-01-01 00:00:00`,
    /// `2015-01-01T12:00`). The time component is discarded.
    pub fn parse_date_flexible(s: &str) -> Result<NaiveDate, DateError> {
        let trimmed = s.trim();
        let day_part = trimmed
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or("");
        if day_part.is_empty() {
            return Err(DateError(format!("empty date value '{}'", s)));
        }
        INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
            .ok_or_else(|| DateError(format!("unrecognised date '{}'", s)))
    }

    /// Three-letter English month abbreviation ("Jan" .. "Dec").
    pub fn month_abbrev(date: &NaiveDate) -> String {
        date.format("%b").to_string()
    }

    /// First day of the month containing `date`.
    pub fn first_of_month(date: &NaiveDate) -> NaiveDate {
        date.with_day(1).unwrap_or(*date)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_date_flexible_layouts() {
            let expected = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();
            for input in [
                "2016-03-07",
                "2016/03/07",
                "03/07/2016",
                "3/7/2016",
                "20160307",
                "2016-03-07 00:00:00",
                "2016-03-07T13:45:00",
                "  2016-03-07  ",
            ] {
                assert_eq!(
                    parse_date_flexible(input).unwrap(),
                    expected,
                    "failed to parse {:?}",
                    input
                );
            }
        }

        #[test]
        fn test_parse_date_flexible_rejects_garbage() {
            assert!(parse_date_flexible("").is_err());
            assert!(parse_date_flexible("not a date").is_err());
            assert!(parse_date_flexible("2016-13-40").is_err());
        }

        #[test]
        fn test_month_helpers() {
            let date = NaiveDate::from_ymd_opt(2017, 9, 23).unwrap();
            assert_eq!(month_abbrev(&date), "Sep");
            assert_eq!(
                first_of_month(&date),
                NaiveDate::from_ymd_opt(2017, 9, 1).unwrap()
            );
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
