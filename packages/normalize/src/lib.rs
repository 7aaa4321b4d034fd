#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Japanese text normalization for registry and listing extraction.
//!
//! Source documents mix full-width and half-width numerals freely
//! (２３：１８ vs 23:18), group digits with either comma width, and date
//! loan contracts in 元号 (era) years. These helpers fold that variation
//! into ASCII digits and Gregorian dates before typed parsing.

pub mod digits;
pub mod era;

pub use digits::{fold_digits, strip_separators};
pub use era::{Era, parse_era_date};
