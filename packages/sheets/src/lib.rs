#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Google Sheets single-cell write client.
//!
//! The submission pipeline only needs two operations against the
//! spreadsheet API, both on the `v4/spreadsheets` surface:
//!
//! - `GET /{id}?fields=sheets.properties` — resolve the first
//!   worksheet's title and grid bounds
//! - `PUT /{id}/values/{range}?valueInputOption=USER_ENTERED` — write
//!   one value into one cell
//!
//! [`SheetsClient`] is constructed explicitly at startup (service
//! account → bearer token, spreadsheet URL → ID) and passed down as a
//! [`CellWriter`]; nothing here is global.

pub mod auth;
pub mod cell;

use async_trait::async_trait;
use thiserror::Error;

pub use auth::ServiceAccount;
pub use cell::{CellRef, CellValue, InvalidCellRef};

/// Base URL of the spreadsheet API surface.
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Errors from spreadsheet operations.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Sheets API returned {status}: {message}")]
    Api {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Response body, for the operator log.
        message: String,
    },

    /// The configured URL does not point at a spreadsheet.
    #[error("not a spreadsheet URL: {url}")]
    SpreadsheetUrl {
        /// The offending URL.
        url: String,
    },

    /// The spreadsheet metadata listed no worksheets.
    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    /// Assertion signing failed (bad private key).
    #[error("token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The token exchange failed or returned an unusable body.
    #[error("auth error: {message}")]
    Auth {
        /// Description of the failure.
        message: String,
    },
}

/// One worksheet's identity and grid bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    /// Tab title, used as the range prefix.
    pub title: String,
    /// Grid row count.
    pub row_count: u32,
    /// Grid column count.
    pub column_count: u32,
}

impl Worksheet {
    /// Whether the cell lies inside this worksheet's grid.
    #[must_use]
    pub const fn contains(&self, cell: CellRef) -> bool {
        cell.row <= self.row_count && cell.column <= self.column_count
    }
}

/// Write access to single cells of a tabular store.
#[async_trait]
pub trait CellWriter: Send + Sync {
    /// Writes one value into one cell of the given worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the write does not reach the store.
    async fn write_cell(
        &self,
        worksheet: &str,
        cell: CellRef,
        value: &CellValue,
    ) -> Result<(), SheetsError>;
}

/// Authenticated client bound to one spreadsheet.
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsClient {
    /// Authenticates the service account and binds the client to the
    /// spreadsheet behind `spreadsheet_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the URL carries no spreadsheet ID or
    /// the token exchange fails.
    pub async fn connect(
        account: &ServiceAccount,
        spreadsheet_url: &str,
    ) -> Result<Self, SheetsError> {
        let spreadsheet_id = parse_spreadsheet_id(spreadsheet_url).ok_or_else(|| {
            SheetsError::SpreadsheetUrl {
                url: spreadsheet_url.to_string(),
            }
        })?;

        let client = reqwest::Client::builder()
            .user_agent("touki-sync/1.0")
            .build()?;
        let token = auth::fetch_access_token(&client, account).await?;
        log::info!("sheets: authenticated as {}", account.client_email);

        Ok(Self {
            client,
            base_url: SHEETS_BASE_URL.to_string(),
            spreadsheet_id,
            token,
        })
    }

    /// The spreadsheet ID this client writes to.
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Resolves the first worksheet's title and grid bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the metadata request fails or the
    /// spreadsheet has no worksheets.
    pub async fn first_worksheet(&self) -> Result<Worksheet, SheetsError> {
        let url = format!(
            "{}/{}?fields=sheets.properties",
            self.base_url, self.spreadsheet_id
        );
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status, message });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_worksheet_response(&body)
    }
}

#[async_trait]
impl CellWriter for SheetsClient {
    async fn write_cell(
        &self,
        worksheet: &str,
        cell: CellRef,
        value: &CellValue,
    ) -> Result<(), SheetsError> {
        let range = format_range(worksheet, cell);
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            self.base_url,
            self.spreadsheet_id,
            encode_range(&range)
        );
        let payload = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value.to_json()]],
        });

        let resp = self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status, message });
        }
        log::debug!("sheets: wrote {range}");
        Ok(())
    }
}

/// Extracts the spreadsheet ID from a `docs.google.com` URL
/// (`…/spreadsheets/d/<id>[/…]`).
#[must_use]
pub fn parse_spreadsheet_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/spreadsheets/d/")?;
    let id: String = rest
        .chars()
        .take_while(|c| !matches!(c, '/' | '?' | '#'))
        .collect();
    if id.is_empty() {
        return None;
    }
    Some(id)
}

/// Builds an A1 range for one cell, always quoting the worksheet title
/// (titles with spaces or non-ASCII would otherwise break the range
/// grammar).
fn format_range(worksheet: &str, cell: CellRef) -> String {
    format!("'{}'!{}", worksheet.replace('\'', "''"), cell)
}

/// Percent-encoding for the range path segment. Non-ASCII is handled by
/// the URL parser; only the path/query delimiters need escaping here.
fn encode_range(s: &str) -> String {
    s.replace('%', "%25")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('#', "%23")
        .replace('&', "%26")
}

/// Pulls the first worksheet out of a `spreadsheets.get` response.
fn parse_worksheet_response(body: &serde_json::Value) -> Result<Worksheet, SheetsError> {
    let props = body
        .get("sheets")
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("properties"))
        .ok_or(SheetsError::NoWorksheet)?;

    let title = props
        .get("title")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Sheet1")
        .to_string();
    let grid = props.get("gridProperties");
    let row_count = grid
        .and_then(|g| g.get("rowCount"))
        .and_then(serde_json::Value::as_u64)
        .map_or(1000, |n| u32::try_from(n).unwrap_or(u32::MAX));
    let column_count = grid
        .and_then(|g| g.get("columnCount"))
        .and_then(serde_json::Value::as_u64)
        .map_or(26, |n| u32::try_from(n).unwrap_or(u32::MAX));

    Ok(Worksheet {
        title,
        row_count,
        column_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spreadsheet_id_from_edit_url() {
        assert_eq!(
            parse_spreadsheet_id(
                "https://docs.google.com/spreadsheets/d/1aBcDeFgHiJkLmNoP/edit#gid=0"
            ),
            Some("1aBcDeFgHiJkLmNoP".to_string())
        );
    }

    #[test]
    fn parses_spreadsheet_id_from_bare_url() {
        assert_eq!(
            parse_spreadsheet_id("https://docs.google.com/spreadsheets/d/1aBcDeFgHiJkLmNoP"),
            Some("1aBcDeFgHiJkLmNoP".to_string())
        );
    }

    #[test]
    fn rejects_non_spreadsheet_urls() {
        assert_eq!(parse_spreadsheet_id("https://example.com/sheet"), None);
        assert_eq!(
            parse_spreadsheet_id("https://docs.google.com/spreadsheets/d/"),
            None
        );
    }

    #[test]
    fn formats_quoted_single_cell_range() {
        let cell: CellRef = "A2".parse().unwrap();
        assert_eq!(format_range("シート1", cell), "'シート1'!A2");
        assert_eq!(
            format_range("owner's copy", cell),
            "'owner''s copy'!A2"
        );
    }

    #[test]
    fn encodes_range_path_delimiters() {
        assert_eq!(encode_range("'A/B'!C3"), "'A%2FB'!C3");
        assert_eq!(encode_range("'100%'!A1"), "'100%25'!A1");
    }

    #[test]
    fn parses_first_worksheet_from_metadata() {
        let body = serde_json::json!({
            "sheets": [
                {
                    "properties": {
                        "title": "シート1",
                        "gridProperties": { "rowCount": 100, "columnCount": 26 }
                    }
                },
                {
                    "properties": {
                        "title": "控え",
                        "gridProperties": { "rowCount": 10, "columnCount": 5 }
                    }
                }
            ]
        });
        let worksheet = parse_worksheet_response(&body).unwrap();
        assert_eq!(
            worksheet,
            Worksheet {
                title: "シート1".to_string(),
                row_count: 100,
                column_count: 26,
            }
        );
    }

    #[test]
    fn missing_worksheets_is_an_error() {
        let body = serde_json::json!({ "sheets": [] });
        assert!(matches!(
            parse_worksheet_response(&body),
            Err(SheetsError::NoWorksheet)
        ));
    }

    #[test]
    fn worksheet_contains_checks_grid_bounds() {
        let worksheet = Worksheet {
            title: "シート1".to_string(),
            row_count: 20,
            column_count: 10,
        };
        assert!(worksheet.contains("J7".parse().unwrap()));
        assert!(worksheet.contains("A20".parse().unwrap()));
        assert!(!worksheet.contains("K7".parse().unwrap()));
        assert!(!worksheet.contains("A21".parse().unwrap()));
    }
}
