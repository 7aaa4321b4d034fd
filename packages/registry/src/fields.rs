//! Per-field extraction rules for registry page text.
//!
//! Each rule scans the full page text for its label and returns a typed
//! `Option`; the rules share nothing and may be tested in isolation.
//! Registry scans mix full-width and half-width numerals, so captured
//! digit runs are folded to ASCII before parsing or formatting.

use chrono::NaiveDate;
use regex::Regex;
use touki_sync_normalize::{Era, fold_digits, parse_era_date, strip_separators};

use crate::RegistryRecord;

/// Applies every field rule to the page text.
#[must_use]
pub fn extract_fields(text: &str) -> RegistryRecord {
    RegistryRecord {
        owner: owner(text),
        room_number: room_number(text),
        floor_area: floor_area(text),
        exclusive_area: exclusive_area(text),
        loan_amount_man_yen: loan_amount(text),
        loan_date: loan_date(text),
    }
}

/// Owner name: the first non-blank line after the 所有者 label, trimmed.
#[must_use]
pub fn owner(text: &str) -> Option<String> {
    let re = Regex::new(r"所有者[\s\S]+?\n\s*(.+?)\s*\n").ok()?;
    let caps = re.captures(text)?;
    let name = caps[1].trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Room number: the 3-digit run after 家屋番号 …の on the same line.
/// Leading zeros are meaningful, so the value stays a string.
#[must_use]
pub fn room_number(text: &str) -> Option<String> {
    let re = Regex::new(r"家屋番号.*?の(\d{3})").ok()?;
    let caps = re.captures(text)?;
    Some(fold_digits(&caps[1]))
}

/// Floor area: the 床面積 entry's `<integer>：<2 digits>` pair, read as
/// a decimal (２３：１８ → `"23.18"`). Either colon width is accepted.
#[must_use]
pub fn floor_area(text: &str) -> Option<String> {
    let re = Regex::new(r"床\s*面\s*積[\s\S]+?(\d{1,3})[:：](\d{2})").ok()?;
    let caps = re.captures(text)?;
    Some(format!(
        "{}.{}",
        fold_digits(&caps[1]),
        fold_digits(&caps[2])
    ))
}

/// Exclusive area in m²: the 敷地権 fraction `<denominator>分の<numerator>`
/// reduced to numerator / 100, two decimal places by construction.
#[must_use]
pub fn exclusive_area(text: &str) -> Option<f64> {
    let re = Regex::new(r"敷地権.+?(\d{2,6})分の(\d{2,6})").ok()?;
    let caps = re.captures(text)?;
    let numerator: f64 = fold_digits(&caps[2]).parse().ok()?;
    Some(numerator / 100.0)
}

/// Loan principal: the 債権額 entry's 金…万円 amount with full-width and
/// half-width thousands separators stripped.
#[must_use]
pub fn loan_amount(text: &str) -> Option<u64> {
    let re = Regex::new(r"債権額\s*金([\d，,]+)万円").ok()?;
    let caps = re.captures(text)?;
    fold_digits(&strip_separators(&caps[1])).parse().ok()
}

/// Loan contract date: the era-dated `<era>N年N月N日` after 金銭消費貸借,
/// converted with the standard era epochs (平成1 = 1989, 令和1 = 2019).
#[must_use]
pub fn loan_date(text: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"金銭消費貸借.*?(令和|平成)(\d+)年(\d+)月(\d+)日").ok()?;
    let caps = re.captures(text)?;
    let era = Era::from_kanji(&caps[1])?;
    let year: i32 = fold_digits(&caps[2]).parse().ok()?;
    let month: u32 = fold_digits(&caps[3]).parse().ok()?;
    let day: u32 = fold_digits(&caps[4]).parse().ok()?;
    parse_era_date(era, year, month, day)
}
