#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Field extraction from legal-registry (登記簿) PDF documents.
//!
//! The PDF's text layer is extracted as flat text and a set of
//! independent, per-field rules is applied to it (see [`fields`]). No
//! layout analysis is performed; single-page 登記簿謄本 scans with a
//! text layer are the supported shape.
//!
//! Every field is best-effort: a rule that finds no match yields `None`
//! and never fails the document. The only error path is a byte stream
//! that cannot be read as a PDF or carries no text at all.

pub mod fields;

use chrono::NaiveDate;
use thiserror::Error;

pub use fields::extract_fields;

/// Errors from registry document extraction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The byte stream could not be parsed as a PDF.
    #[error("PDF extraction error: {0}")]
    Extraction(#[from] pdf_extract::OutputError),

    /// The PDF parsed but carries no text layer (e.g. an image-only scan).
    #[error("document contains no extractable text")]
    EmptyDocument,
}

/// Normalized fields extracted from one registry document.
///
/// Each field is `None` when its rule found no match; substitution of
/// the on-sheet failure markers happens at the write boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryRecord {
    /// Owner name from the 所有者 entry.
    pub owner: Option<String>,
    /// 3-digit room number from the 家屋番号 entry, leading zeros kept.
    pub room_number: Option<String>,
    /// Floor area in m² as a decimal string (e.g. `"23.18"`).
    pub floor_area: Option<String>,
    /// Exclusive area in m², derived from the land-rights fraction.
    pub exclusive_area: Option<f64>,
    /// Loan principal in units of 万円 (ten thousand yen).
    pub loan_amount_man_yen: Option<u64>,
    /// Loan contract date from the 金銭消費貸借 entry.
    pub loan_date: Option<NaiveDate>,
}

impl RegistryRecord {
    /// Names of the fields whose rules did not match, for operator logs.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.owner.is_none() {
            missing.push("owner");
        }
        if self.room_number.is_none() {
            missing.push("room_number");
        }
        if self.floor_area.is_none() {
            missing.push("floor_area");
        }
        if self.exclusive_area.is_none() {
            missing.push("exclusive_area");
        }
        if self.loan_amount_man_yen.is_none() {
            missing.push("loan_amount");
        }
        if self.loan_date.is_none() {
            missing.push("loan_date");
        }
        missing
    }
}

/// Extracts the registry fields from a PDF byte stream.
///
/// # Errors
///
/// Returns [`RegistryError`] if the bytes are not a readable PDF or the
/// document has no text layer. Individual fields that fail to match are
/// `None` in the returned record, never an error.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<RegistryRecord, RegistryError> {
    let text = pdf_extract::extract_text_from_mem(bytes)?;
    if text.trim().is_empty() {
        return Err(RegistryError::EmptyDocument);
    }
    log::debug!("registry: extracted {} chars of page text", text.len());

    let record = fields::extract_fields(&text);
    let missing = record.missing_fields();
    if missing.is_empty() {
        log::info!("registry: all fields extracted");
    } else {
        log::warn!("registry: no match for {}", missing.join(", "));
    }
    Ok(record)
}
