//! Declarative field-to-cell layout of the record sheet.
//!
//! The layout is data, not code: a TOML `[cells]` table maps field names
//! to single-cell A1 references on the first worksheet. The reference
//! layout is baked into the binary via [`include_str!`]; a config file
//! may override it. Validation runs up front, before any network call.

use std::collections::BTreeMap;

use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use touki_sync_sheets::{CellRef, InvalidCellRef, Worksheet};

/// Reference layout embedded at compile time.
const REFERENCE_CELL_MAP: &str = include_str!("../cell_map.toml");

/// One extractable field of a submission.
///
/// Declaration order is write order; `BTreeMap<Field, _>` iteration
/// follows it via the derived `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// Registered owner name (甲区).
    Owner,
    /// Building name from the listing page heading.
    Name,
    /// Three-digit room number from the lot designation (家屋番号).
    RoomNumber,
    /// Registered floor area in square meters, kept as the `"a.b"` text
    /// the document prints.
    FloorArea,
    /// Exclusive land share in square meters.
    ExclusiveArea,
    /// Total units in the building.
    TotalUnits,
    /// Above-ground floor count.
    FloorCount,
    /// Nearest station walk descriptor.
    Station1,
    /// Second-nearest station walk descriptor.
    Station2,
    /// Prefectural address from the listing page.
    Address,
    /// Registered loan principal in units of 10,000 yen (乙区).
    LoanAmount,
    /// Loan contract date (乙区).
    LoanDate,
}

impl Field {
    /// Returns all fields in write order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Owner,
            Self::Name,
            Self::RoomNumber,
            Self::FloorArea,
            Self::ExclusiveArea,
            Self::TotalUnits,
            Self::FloorCount,
            Self::Station1,
            Self::Station2,
            Self::Address,
            Self::LoanAmount,
            Self::LoanDate,
        ]
    }
}

/// Validation errors for a field-to-cell map.
#[derive(Debug, Error)]
pub enum CellMapError {
    /// The `[cells]` table failed to parse as TOML.
    #[error("invalid cell map TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A key is not one of the known field names.
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    /// A field was given more than one cell.
    #[error("field '{field}' is mapped more than once")]
    DuplicateField { field: Field },

    /// Two fields share one cell.
    #[error("cell {cell} is mapped to more than one field")]
    DuplicateCell { cell: CellRef },

    /// A mapped value is not a valid A1 reference.
    #[error(transparent)]
    InvalidCell(#[from] InvalidCellRef),

    /// The map has no entries.
    #[error("cell map has no entries")]
    Empty,

    /// A mapped cell lies outside the target worksheet grid.
    #[error("cell {cell} ({field}) is outside worksheet '{title}' ({rows} rows, {columns} columns)")]
    OutOfBounds {
        field: Field,
        cell: CellRef,
        title: String,
        rows: u32,
        columns: u32,
    },
}

/// On-disk shape: a single `[cells]` table of `field = "A1"` pairs.
#[derive(Debug, Deserialize)]
struct CellMapFile {
    cells: BTreeMap<String, String>,
}

/// A validated field-to-cell mapping.
///
/// Fields absent from the map are extracted but never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMap {
    cells: BTreeMap<Field, CellRef>,
}

impl CellMap {
    /// Builds a map from `(field name, cell reference)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error when a name is unknown, a field or cell repeats,
    /// a reference fails to parse, or no entries remain.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, CellMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cells: BTreeMap<Field, CellRef> = BTreeMap::new();

        for (name, reference) in entries {
            let field: Field = name
                .as_ref()
                .parse()
                .map_err(|_| CellMapError::UnknownField {
                    name: name.as_ref().to_string(),
                })?;
            let cell: CellRef = reference.as_ref().parse()?;

            if cells.values().any(|existing| *existing == cell) {
                return Err(CellMapError::DuplicateCell { cell });
            }
            if cells.insert(field, cell).is_some() {
                return Err(CellMapError::DuplicateField { field });
            }
        }

        if cells.is_empty() {
            return Err(CellMapError::Empty);
        }

        Ok(Self { cells })
    }

    /// Parses a map from TOML text containing a `[cells]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the entries fail
    /// validation.
    pub fn from_toml(text: &str) -> Result<Self, CellMapError> {
        let file: CellMapFile = toml::from_str(text)?;
        Self::from_entries(file.cells)
    }

    /// Returns the reference layout baked into the binary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `cell_map.toml` fails to parse or
    /// validate.
    #[must_use]
    pub fn reference() -> Self {
        Self::from_toml(REFERENCE_CELL_MAP)
            .unwrap_or_else(|e| panic!("Failed to parse cell_map.toml: {e}"))
    }

    /// Returns the cell mapped to `field`, if any.
    #[must_use]
    pub fn cell_for(&self, field: Field) -> Option<CellRef> {
        self.cells.get(&field).copied()
    }

    /// Iterates mapped `(field, cell)` pairs in write order.
    pub fn entries(&self) -> impl Iterator<Item = (Field, CellRef)> + '_ {
        self.cells.iter().map(|(field, cell)| (*field, *cell))
    }

    /// Number of mapped fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when no field is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks every mapped cell against the worksheet's grid bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CellMapError::OutOfBounds`] for the first mapped cell
    /// that falls outside the grid.
    pub fn check_bounds(&self, worksheet: &Worksheet) -> Result<(), CellMapError> {
        for (field, cell) in self.entries() {
            if !worksheet.contains(cell) {
                return Err(CellMapError::OutOfBounds {
                    field,
                    cell,
                    title: worksheet.title.clone(),
                    rows: worksheet.row_count,
                    columns: worksheet.column_count,
                });
            }
        }
        Ok(())
    }
}
