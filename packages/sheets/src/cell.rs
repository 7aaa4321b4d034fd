//! A1-notation cell references and typed cell values.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

/// A string that does not parse as a single-cell A1 reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell reference: {0:?}")]
pub struct InvalidCellRef(pub String);

/// A single-cell reference in A1 notation (column letters + 1-based row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellRef {
    /// 1-based column index (A = 1, Z = 26, AA = 27).
    pub column: u32,
    /// 1-based row index.
    pub row: u32,
}

impl FromStr for CellRef {
    type Err = InvalidCellRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: String = s.chars().take_while(char::is_ascii_alphabetic).collect();
        let digits = &s[letters.len()..];
        if letters.is_empty() || letters.len() > 3 || digits.is_empty() {
            return Err(InvalidCellRef(s.to_string()));
        }

        let mut column: u32 = 0;
        for c in letters.chars() {
            let value = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
            column = column * 26 + value;
        }

        let row: u32 = digits.parse().map_err(|_| InvalidCellRef(s.to_string()))?;
        if row == 0 {
            return Err(InvalidCellRef(s.to_string()));
        }
        Ok(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bijective base-26: A..Z, AA..AZ, BA..
        let mut letters = Vec::new();
        let mut n = self.column;
        while n > 0 {
            n -= 1;
            letters.push(char::from(b'A' + u8::try_from(n % 26).unwrap_or(0)));
            n /= 26;
        }
        letters.reverse();
        for c in letters {
            write!(f, "{c}")?;
        }
        write!(f, "{}", self.row)
    }
}

/// A typed value destined for one spreadsheet cell.
///
/// Values are written with `USER_ENTERED` input mode, so numbers and
/// ISO dates land as real numbers and dates on the sheet. Text is
/// exempt: it carries the leading-apostrophe marker on the wire and
/// always lands as literal text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Literal text; never re-parsed by the sheet.
    Text(String),
    /// Decimal number.
    Number(f64),
    /// Whole number.
    Integer(u64),
    /// Calendar date, written as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Empty cell (clears any existing content).
    Blank,
}

impl CellValue {
    /// JSON form for the `values.update` payload.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            // `USER_ENTERED` re-parses bare strings ("012" would land
            // as the number 12); the apostrophe keeps them literal.
            Self::Text(s) => serde_json::Value::String(format!("'{s}")),
            Self::Number(n) => serde_json::json!(n),
            Self::Integer(i) => serde_json::json!(i),
            Self::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Self::Blank => serde_json::Value::String(String::new()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Blank => Ok(()),
        }
    }
}
