//! Per-field extraction rules for listing page text.
//!
//! Each rule scans the flattened page text for its label and returns a
//! typed `Option`; the rules share nothing and may be tested in
//! isolation. The listing name comes from the page's heading element
//! rather than the flat text, so [`extract_fields`] takes both.

use regex::Regex;
use touki_sync_normalize::fold_digits;

use crate::{ListingRecord, StationWalk};

/// Applies every field rule to the page text and heading.
#[must_use]
pub fn extract_fields(text: &str, heading: Option<&str>) -> ListingRecord {
    let mut stations = stations(text).into_iter();
    ListingRecord {
        name: name(heading),
        address: address(text),
        station1: stations.next(),
        station2: stations.next(),
        floor_count: floor_count(text),
        total_units: total_units(text),
    }
}

/// Listing name: the page's first heading, trimmed; empty headings count
/// as missing.
#[must_use]
pub fn name(heading: Option<&str>) -> Option<String> {
    let name = heading?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Address: the 所在地 entry's value up to the line break. Listings in
/// scope are Tokyo properties, so the value must carry the 東京都 prefix.
#[must_use]
pub fn address(text: &str) -> Option<String> {
    let re = Regex::new(r"所在地\s*[:：]\s*(東京都.+?)\n").ok()?;
    let caps = re.captures(text)?;
    Some(caps[1].trim().to_string())
}

/// Every `<station>駅 徒歩<N>分` occurrence in document order.
#[must_use]
pub fn stations(text: &str) -> Vec<StationWalk> {
    let Ok(re) = Regex::new(r"(.+?)駅\s*徒歩(\d+)分") else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            let station = caps[1].trim().to_string();
            let walk_minutes: u32 = fold_digits(&caps[2]).parse().ok()?;
            if station.is_empty() {
                return None;
            }
            Some(StationWalk {
                station,
                walk_minutes,
            })
        })
        .collect()
}

/// Building floor count: the 階建て entry's `<N>階建` value.
#[must_use]
pub fn floor_count(text: &str) -> Option<u32> {
    let re = Regex::new(r"階建て\s*[:：]\s*(\d+)階建").ok()?;
    let caps = re.captures(text)?;
    fold_digits(&caps[1]).parse().ok()
}

/// Total unit count: the 総戸数 entry's `<N>戸` value.
#[must_use]
pub fn total_units(text: &str) -> Option<u32> {
    let re = Regex::new(r"総戸数\s*[:：]\s*(\d+)戸").ok()?;
    let caps = re.captures(text)?;
    fold_digits(&caps[1]).parse().ok()
}
