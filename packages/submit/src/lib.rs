#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Submission pipeline: extract both sources, render the write plan,
//! push it to the record sheet.
//!
//! The flow is linear: one PDF, one listing URL, one worksheet, at most
//! a dozen cell writes. Per-field extraction misses surface as sentinel
//! cells; fetch, auth, layout and store failures abort the run with a
//! [`SubmitError`].

pub mod cells;
pub mod config;
pub mod interactive;
pub mod plan;

use thiserror::Error;
use touki_sync_listing::ListingError;
use touki_sync_registry::RegistryError;
use touki_sync_sheets::{CellWriter, SheetsClient, SheetsError, Worksheet};

pub use cells::{CellMap, CellMapError, Field};
pub use config::{Config, ConfigError};
pub use plan::{CellWrite, FIELD_SENTINEL, OWNER_SENTINEL, Submission};

/// Errors surfaced by a submission run.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Config file problems.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The cell layout failed validation.
    #[error("cell map error: {0}")]
    CellMap(#[from] CellMapError),

    /// The registry PDF could not be read as a document.
    #[error("registry document error: {0}")]
    Registry(#[from] RegistryError),

    /// The listing page could not be fetched.
    #[error("listing page error: {0}")]
    Listing(#[from] ListingError),

    /// Spreadsheet auth, metadata, or write failure.
    #[error("spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    /// A local file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads a local file into memory, tagging any failure with its path.
///
/// # Errors
///
/// Returns [`SubmitError::Io`] when the file cannot be read.
pub fn read_file(path: &std::path::Path) -> Result<Vec<u8>, SubmitError> {
    std::fs::read(path).map_err(|source| SubmitError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Extracts both records for one property.
///
/// # Errors
///
/// Returns [`SubmitError`] when the PDF yields no text or the listing
/// page cannot be fetched. Per-field misses are not errors; they show
/// up as `None` fields in the returned [`Submission`].
pub async fn extract_submission(
    pdf_bytes: &[u8],
    listing_url: &str,
) -> Result<Submission, SubmitError> {
    let registry = touki_sync_registry::extract_from_bytes(pdf_bytes)?;
    let listing = touki_sync_listing::fetch_listing(listing_url).await?;
    Ok(Submission { registry, listing })
}

/// Resolves the first worksheet and checks the layout against its grid.
///
/// # Errors
///
/// Returns [`SubmitError`] when the metadata request fails or a mapped
/// cell falls outside the worksheet.
pub async fn validate_layout(
    client: &SheetsClient,
    map: &CellMap,
) -> Result<Worksheet, SubmitError> {
    let worksheet = client.first_worksheet().await?;
    map.check_bounds(&worksheet)?;
    log::debug!(
        "submit: layout fits '{}' ({} rows, {} columns)",
        worksheet.title,
        worksheet.row_count,
        worksheet.column_count
    );
    Ok(worksheet)
}

/// Writes a rendered plan through the store client, one cell at a time,
/// in plan order.
///
/// # Errors
///
/// Returns [`SubmitError::Sheets`] for the first write that fails;
/// earlier writes are left in place.
pub async fn write_plan(
    writer: &dyn CellWriter,
    worksheet: &str,
    plan: &[CellWrite],
) -> Result<u64, SubmitError> {
    let mut written = 0u64;
    for write in plan {
        log::info!(
            "submit: {} -> {} = {}",
            write.field,
            write.cell,
            write.value
        );
        writer
            .write_cell(worksheet, write.cell, &write.value)
            .await?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use touki_sync_sheets::{CellRef, CellValue};

    use super::*;

    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl CellWriter for RecordingWriter {
        async fn write_cell(
            &self,
            worksheet: &str,
            cell: CellRef,
            value: &CellValue,
        ) -> Result<(), SheetsError> {
            self.writes.lock().unwrap().push((
                worksheet.to_string(),
                cell.to_string(),
                value.to_string(),
            ));
            Ok(())
        }
    }

    struct FailingWriter;

    #[async_trait]
    impl CellWriter for FailingWriter {
        async fn write_cell(
            &self,
            _worksheet: &str,
            _cell: CellRef,
            _value: &CellValue,
        ) -> Result<(), SheetsError> {
            Err(SheetsError::NoWorksheet)
        }
    }

    #[tokio::test]
    async fn write_plan_issues_every_write_in_order() {
        let plan = Submission::default().plan(&CellMap::reference());
        let writer = RecordingWriter::default();

        let written = write_plan(&writer, "シート1", &plan).await.unwrap();
        assert_eq!(written, 10);

        let writes = writer.writes.lock().unwrap();
        assert_eq!(writes.len(), 10);
        assert_eq!(
            writes[0],
            (
                "シート1".to_string(),
                "A2".to_string(),
                OWNER_SENTINEL.to_string()
            )
        );
        assert_eq!(writes[9].1, "D17");
    }

    #[tokio::test]
    async fn store_failure_aborts_the_run() {
        let plan = Submission::default().plan(&CellMap::reference());

        let result = write_plan(&FailingWriter, "シート1", &plan).await;
        assert!(matches!(result, Err(SubmitError::Sheets(_))));
    }
}
