//! Era (元号) to Gregorian date conversion.
//!
//! Registry documents date loan contracts in era years (平成３年 etc.).
//! Era year 1 is the era's epoch year: 平成1 = 1989, 令和1 = 2019.

use chrono::NaiveDate;

/// A Japanese calendar era supported by the registry date rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    /// 平成 (1989 through April 2019).
    Heisei,
    /// 令和 (May 2019 onward).
    Reiwa,
}

impl Era {
    /// Parses an era from its kanji name.
    #[must_use]
    pub fn from_kanji(s: &str) -> Option<Self> {
        match s {
            "平成" => Some(Self::Heisei),
            "令和" => Some(Self::Reiwa),
            _ => None,
        }
    }

    /// Gregorian year of the era's year 1.
    #[must_use]
    pub const fn epoch_year(self) -> i32 {
        match self {
            Self::Heisei => 1989,
            Self::Reiwa => 2019,
        }
    }

    /// Converts an era year to a Gregorian year.
    ///
    /// Returns `None` for era years below 1 or large enough to leave
    /// `i32` range.
    #[must_use]
    pub const fn to_gregorian(self, year: i32) -> Option<i32> {
        if year < 1 {
            return None;
        }
        (self.epoch_year() - 1).checked_add(year)
    }
}

/// Builds a calendar date from an era year/month/day triple.
///
/// Returns `None` for era years below 1 and for component combinations
/// that do not form a real date (e.g. February 30th, or a year past the
/// supported calendar range).
#[must_use]
pub fn parse_era_date(era: Era, year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(era.to_gregorian(year)?, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_heisei_epoch() {
        assert_eq!(
            parse_era_date(Era::Heisei, 1, 1, 8),
            NaiveDate::from_ymd_opt(1989, 1, 8)
        );
    }

    #[test]
    fn converts_heisei_year_thirty() {
        // 平成30 is 2018: the epoch offset applies exactly once.
        assert_eq!(
            parse_era_date(Era::Heisei, 30, 6, 15),
            NaiveDate::from_ymd_opt(2018, 6, 15)
        );
    }

    #[test]
    fn converts_last_heisei_day() {
        assert_eq!(
            parse_era_date(Era::Heisei, 31, 4, 30),
            NaiveDate::from_ymd_opt(2019, 4, 30)
        );
    }

    #[test]
    fn converts_reiwa_epoch() {
        assert_eq!(
            parse_era_date(Era::Reiwa, 1, 5, 1),
            NaiveDate::from_ymd_opt(2019, 5, 1)
        );
    }

    #[test]
    fn converts_recent_reiwa_year() {
        assert_eq!(
            parse_era_date(Era::Reiwa, 7, 8, 26),
            NaiveDate::from_ymd_opt(2025, 8, 26)
        );
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert_eq!(parse_era_date(Era::Reiwa, 2, 2, 30), None);
    }

    #[test]
    fn rejects_era_year_below_one() {
        assert_eq!(parse_era_date(Era::Heisei, 0, 1, 1), None);
    }

    #[test]
    fn rejects_era_years_past_the_calendar() {
        assert_eq!(Era::Heisei.to_gregorian(30), Some(2018));
        assert_eq!(Era::Reiwa.to_gregorian(i32::MAX), None);
        assert_eq!(parse_era_date(Era::Reiwa, 2_147_483_000, 1, 1), None);
        assert_eq!(parse_era_date(Era::Heisei, 1_000_000, 1, 1), None);
    }

    #[test]
    fn parses_era_kanji() {
        assert_eq!(Era::from_kanji("平成"), Some(Era::Heisei));
        assert_eq!(Era::from_kanji("令和"), Some(Era::Reiwa));
        assert_eq!(Era::from_kanji("昭和"), None);
    }
}
