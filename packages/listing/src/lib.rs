#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing page fetch and field extraction.
//!
//! Fetches a property-listing URL (single request, 10-second timeout, no
//! retries), flattens the HTML to text, and applies independent per-field
//! rules (see [`fields`]) to pull out the listing name, address, nearest
//! stations, floor count and unit count.
//!
//! A fetch failure or non-success status is a [`ListingError`] — a
//! document-level condition, reported as such. A page that fetched fine
//! but matches none of the rules yields a record of `None`s instead;
//! field-level misses are never errors.

pub mod fields;

use std::fmt;
use std::time::Duration;

use scraper::{Html, Selector};
use thiserror::Error;

pub use fields::extract_fields;

/// Timeout for the single listing page request.
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Errors from fetching a listing page.
#[derive(Debug, Error)]
pub enum ListingError {
    /// HTTP transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("listing page returned {status}")]
    Status {
        /// The response status code.
        status: reqwest::StatusCode,
    },
}

/// A nearest-station descriptor: station name plus walking minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationWalk {
    /// Station name without the 駅 suffix.
    pub station: String,
    /// Walking time in minutes.
    pub walk_minutes: u32,
}

impl fmt::Display for StationWalk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}駅 徒歩{}分", self.station, self.walk_minutes)
    }
}

/// Normalized fields extracted from one listing page.
///
/// Each field is `None` when its rule found no match; substitution of
/// the on-sheet failure markers happens at the write boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// Listing name from the page's first heading.
    pub name: Option<String>,
    /// Street address from the 所在地 entry.
    pub address: Option<String>,
    /// Nearest station, first occurrence in document order.
    pub station1: Option<StationWalk>,
    /// Second-nearest station, second occurrence in document order.
    pub station2: Option<StationWalk>,
    /// Building floor count from the 階建て entry.
    pub floor_count: Option<u32>,
    /// Total unit count from the 総戸数 entry.
    pub total_units: Option<u32>,
}

impl ListingRecord {
    /// Names of the fields whose rules did not match, for operator logs.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.address.is_none() {
            missing.push("address");
        }
        if self.station1.is_none() {
            missing.push("station1");
        }
        if self.station2.is_none() {
            missing.push("station2");
        }
        if self.floor_count.is_none() {
            missing.push("floor_count");
        }
        if self.total_units.is_none() {
            missing.push("total_units");
        }
        missing
    }
}

/// Fetches a listing page and extracts its fields.
///
/// # Errors
///
/// Returns [`ListingError`] if the request fails, times out, or the
/// server answers with a non-success status. Fields that fail to match
/// on a fetched page are `None` in the returned record, never an error.
pub async fn fetch_listing(url: &str) -> Result<ListingRecord, ListingError> {
    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    log::info!("listing: fetching {url}");
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ListingError::Status { status });
    }
    let html = resp.text().await?;

    // `Html` is not `Send`, so parse and extract inside a block that
    // drops it before anything else awaits.
    let record = {
        let doc = Html::parse_document(&html);
        let heading = first_heading(&doc);
        let text = doc.root_element().text().collect::<String>();
        fields::extract_fields(&text, heading.as_deref())
    };

    let missing = record.missing_fields();
    if missing.is_empty() {
        log::info!("listing: all fields extracted");
    } else {
        log::warn!("listing: no match for {}", missing.join(", "));
    }
    Ok(record)
}

/// Text of the document's first `<h1>`, trimmed; `None` when the page
/// has no heading.
fn first_heading(doc: &Html) -> Option<String> {
    let sel = Selector::parse("h1").ok()?;
    let el = doc.select(&sel).next()?;
    let text = el.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_walk_formats_descriptor() {
        let station = StationWalk {
            station: "渋谷".to_string(),
            walk_minutes: 5,
        };
        assert_eq!(station.to_string(), "渋谷駅 徒歩5分");
    }

    #[test]
    fn first_heading_takes_first_h1() {
        let doc = Html::parse_document(
            "<html><body><h1> グランドメゾン神南 </h1><h1>別館</h1></body></html>",
        );
        assert_eq!(
            first_heading(&doc),
            Some("グランドメゾン神南".to_string())
        );
    }

    #[test]
    fn first_heading_rejects_empty_heading() {
        let doc = Html::parse_document("<html><body><h1>  </h1></body></html>");
        assert_eq!(first_heading(&doc), None);
    }

    #[test]
    fn first_heading_none_without_h1() {
        let doc = Html::parse_document("<html><body><p>本文</p></body></html>");
        assert_eq!(first_heading(&doc), None);
    }

    #[test]
    fn missing_fields_names_unmatched_rules() {
        let record = ListingRecord {
            name: Some("物件".to_string()),
            ..ListingRecord::default()
        };
        assert_eq!(
            record.missing_fields(),
            vec![
                "address",
                "station1",
                "station2",
                "floor_count",
                "total_units"
            ]
        );
    }

    #[tokio::test]
    async fn refused_connection_yields_http_error() {
        // Nothing listens on the discard port, so the connect is
        // refused rather than timing out.
        let result = fetch_listing("http://127.0.0.1:9/listing").await;
        assert!(matches!(result, Err(ListingError::Http(_))));
    }

    #[tokio::test]
    async fn non_success_status_yields_status_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // The request is tiny and has no body; one read drains it.
            let mut buf = [0u8; 1024];
            let request_len = socket.read(&mut buf).await.unwrap();
            assert!(request_len > 0);
            socket
                .write_all(
                    b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                )
                .await
                .unwrap();
        });

        let result = fetch_listing(&format!("http://{addr}/gone")).await;
        assert!(matches!(
            result,
            Err(ListingError::Status { status }) if status == reqwest::StatusCode::NOT_FOUND
        ));
    }
}
