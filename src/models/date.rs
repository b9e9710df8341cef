//! Backend date text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar date as shipped by the backend: `dd/mm/yyyy` text.
///
/// The text is lexicographically unordered and must be parsed before any
/// comparison. The day/month/year order is fixed; there is no locale
/// detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDate(String);

impl RawDate {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a calendar date. `None` means the text is not a valid
    /// `dd/mm/yyyy` date; callers treat that as fail-closed.
    pub fn parse(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), "%d/%m/%Y").ok()
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RawDate {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_month_year() {
        let date = RawDate::from("05/03/2024");
        assert_eq!(
            date.parse(),
            Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_is_not_month_first() {
        // 25th of January, not month 25.
        let date = RawDate::from("25/01/2024");
        assert_eq!(
            date.parse(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 25).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(RawDate::from("2024-03-05").parse(), None);
        assert_eq!(RawDate::from("31/02/2024").parse(), None);
        assert_eq!(RawDate::from("").parse(), None);
        assert_eq!(RawDate::from("soon").parse(), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(RawDate::from(" 01/01/2024 ").parse().is_some());
    }

    #[test]
    fn test_serde_transparent() {
        let date = RawDate::from("05/03/2024");
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"05/03/2024\"");
        let parsed: RawDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }
}
