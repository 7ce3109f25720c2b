//! Calendar month bucket used as part of the aggregation key.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::error::ValidationError;

/// A (year, month) pair in the UTC calendar. Year 1..=9999, month 1..=12.
///
/// Ordering is chronological, so sorted aggregate rows come out
/// oldest-first within an author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=9999).contains(&year) {
            return Err(ValidationError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(ValidationError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Buckets an instant by the UTC calendar. Offsets in the source
    /// timestamp were already normalized away by the wire layer, so two
    /// commits at the same instant land in the same bucket no matter
    /// which timezone reported them.
    pub fn from_utc(at: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::new(at.year(), at.month())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn validates_ranges() {
        assert!(YearMonth::new(2025, 1).is_ok());
        assert!(YearMonth::new(1, 1).is_ok());
        assert!(YearMonth::new(9999, 12).is_ok());

        assert_eq!(
            YearMonth::new(0, 1),
            Err(ValidationError::YearOutOfRange(0))
        );
        assert_eq!(
            YearMonth::new(10_000, 1),
            Err(ValidationError::YearOutOfRange(10_000))
        );
        assert_eq!(
            YearMonth::new(2025, 0),
            Err(ValidationError::MonthOutOfRange(0))
        );
        assert_eq!(
            YearMonth::new(2025, 13),
            Err(ValidationError::MonthOutOfRange(13))
        );
    }

    #[test]
    fn buckets_by_utc_calendar() {
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let ym = YearMonth::from_utc(at).unwrap();
        assert_eq!((ym.year(), ym.month()), (2025, 1));

        // One second later is February.
        let next = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let ym = YearMonth::from_utc(next).unwrap();
        assert_eq!((ym.year(), ym.month()), (2025, 2));
    }

    #[test]
    fn orders_chronologically() {
        let dec = YearMonth::new(2024, 12).unwrap();
        let jan = YearMonth::new(2025, 1).unwrap();
        let feb = YearMonth::new(2025, 2).unwrap();
        assert!(dec < jan);
        assert!(jan < feb);
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(YearMonth::new(2025, 3).unwrap().to_string(), "2025-03");
        assert_eq!(YearMonth::new(812, 11).unwrap().to_string(), "0812-11");
    }
}
