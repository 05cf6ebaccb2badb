//! Calendar types: the day offset for scheduled ingestion and explicit match dates.

use crate::error::{IngestError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted day offset. Schedules further out are not reliable.
pub const MAX_DAY_OFFSET: u8 = 2;

/// Number of days from today for which scheduled matches are discovered.
///
/// Only `0..=MAX_DAY_OFFSET` can be constructed, so holding a `DayOffset`
/// means validation already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayOffset(u8);

impl DayOffset {
    pub fn new(offset: i64) -> Result<Self> {
        if (0..=i64::from(MAX_DAY_OFFSET)).contains(&offset) {
            Ok(Self(offset as u8))
        } else {
            Err(IngestError::InvalidDayOffset {
                offset,
                max: MAX_DAY_OFFSET,
            })
        }
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Calendar date this offset points at, counted from `today`.
    pub fn target_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.0)))
            .unwrap_or(today)
    }
}

impl Default for DayOffset {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DayOffset {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.trim().parse()?)
    }
}

/// A calendar date given on the command line as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchDate(pub NaiveDate);

impl MatchDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for MatchDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for MatchDate {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| IngestError::InvalidDate {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_offset_accepts_valid_range() {
        for offset in 0..=2 {
            assert_eq!(DayOffset::new(offset).unwrap().as_u8() as i64, offset);
        }
    }

    #[test]
    fn test_day_offset_rejects_out_of_range() {
        for offset in [-1, 3, 7, 100] {
            match DayOffset::new(offset) {
                Err(IngestError::InvalidDayOffset { offset: got, max }) => {
                    assert_eq!(got, offset);
                    assert_eq!(max, MAX_DAY_OFFSET);
                }
                other => panic!("Expected InvalidDayOffset, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_day_offset_from_str() {
        assert_eq!("1".parse::<DayOffset>().unwrap().as_u8(), 1);
        assert!("3".parse::<DayOffset>().is_err());
        assert!("tomorrow".parse::<DayOffset>().is_err());
    }

    #[test]
    fn test_target_date_adds_offset() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let offset = DayOffset::new(2).unwrap();
        assert_eq!(
            offset.target_date(today),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_match_date_parse_and_display() {
        let date: MatchDate = "2024-05-19".parse().unwrap();
        assert_eq!(date.to_string(), "2024-05-19");

        match "19/05/2024".parse::<MatchDate>() {
            Err(IngestError::InvalidDate { value }) => assert_eq!(value, "19/05/2024"),
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }
}
