//! Sentinel rendering and write-plan construction.
//!
//! A [`Submission`] pairs the two extracted records; [`Submission::plan`]
//! turns it into the ordered list of single-cell writes for a
//! [`crate::cells::CellMap`]. Fields whose rules found no match are
//! filled with the on-sheet failure markers here, at the write boundary,
//! so the extractors themselves never have to know about them.

use touki_sync_listing::{ListingRecord, StationWalk};
use touki_sync_registry::RegistryRecord;
use touki_sync_sheets::{CellRef, CellValue};

use crate::cells::{CellMap, Field};

/// Written in place of the owner when its rule found no match.
pub const OWNER_SENTINEL: &str = "❌（自動取得不可）";

/// Written in place of any other text field whose rule found no match.
pub const FIELD_SENTINEL: &str = "❌";

/// The two extracted records for one property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    /// Fields from the registry PDF.
    pub registry: RegistryRecord,
    /// Fields from the listing page.
    pub listing: ListingRecord,
}

/// One pending single-cell write.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    /// The field the value came from.
    pub field: Field,
    /// Target cell on the first worksheet.
    pub cell: CellRef,
    /// Rendered value.
    pub value: CellValue,
}

impl Submission {
    /// Renders the cell value for one field.
    ///
    /// Text fields fall back to the `❌` sentinels when extraction found
    /// nothing; the typed loan fields fall back to [`CellValue::Blank`].
    #[must_use]
    pub fn render_field(&self, field: Field) -> CellValue {
        match field {
            Field::Owner => text_or_sentinel(self.registry.owner.as_deref(), OWNER_SENTINEL),
            Field::Name => text_or_sentinel(self.listing.name.as_deref(), FIELD_SENTINEL),
            Field::RoomNumber => {
                text_or_sentinel(self.registry.room_number.as_deref(), FIELD_SENTINEL)
            }
            Field::FloorArea => {
                text_or_sentinel(self.registry.floor_area.as_deref(), FIELD_SENTINEL)
            }
            Field::ExclusiveArea => self
                .registry
                .exclusive_area
                .map_or_else(field_sentinel, CellValue::Number),
            Field::TotalUnits => self
                .listing
                .total_units
                .map_or_else(field_sentinel, |units| CellValue::Integer(u64::from(units))),
            Field::FloorCount => self
                .listing
                .floor_count
                .map_or_else(field_sentinel, |floors| {
                    CellValue::Integer(u64::from(floors))
                }),
            Field::Station1 => station_or_sentinel(self.listing.station1.as_ref()),
            Field::Station2 => station_or_sentinel(self.listing.station2.as_ref()),
            Field::Address => text_or_sentinel(self.listing.address.as_deref(), FIELD_SENTINEL),
            Field::LoanAmount => self
                .registry
                .loan_amount_man_yen
                .map_or(CellValue::Blank, CellValue::Integer),
            Field::LoanDate => self
                .registry
                .loan_date
                .map_or(CellValue::Blank, CellValue::Date),
        }
    }

    /// Builds the ordered write plan for this submission against `map`.
    #[must_use]
    pub fn plan(&self, map: &CellMap) -> Vec<CellWrite> {
        map.entries()
            .map(|(field, cell)| CellWrite {
                field,
                cell,
                value: self.render_field(field),
            })
            .collect()
    }
}

fn text_or_sentinel(value: Option<&str>, sentinel: &str) -> CellValue {
    CellValue::Text(value.unwrap_or(sentinel).to_string())
}

fn field_sentinel() -> CellValue {
    CellValue::Text(FIELD_SENTINEL.to_string())
}

fn station_or_sentinel(station: Option<&StationWalk>) -> CellValue {
    station.map_or_else(field_sentinel, |walk| CellValue::Text(walk.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn full_submission() -> Submission {
        Submission {
            registry: RegistryRecord {
                owner: Some("山田太郎".to_string()),
                room_number: Some("305".to_string()),
                floor_area: Some("23.18".to_string()),
                exclusive_area: Some(62.34),
                loan_amount_man_yen: Some(1980),
                loan_date: NaiveDate::from_ymd_opt(2020, 3, 15),
            },
            listing: ListingRecord {
                name: Some("グランドメゾン神南".to_string()),
                address: Some("東京都渋谷区神南１丁目１５－３".to_string()),
                station1: Some(StationWalk {
                    station: "渋谷".to_string(),
                    walk_minutes: 5,
                }),
                station2: Some(StationWalk {
                    station: "原宿".to_string(),
                    walk_minutes: 12,
                }),
                floor_count: Some(14),
                total_units: Some(120),
            },
        }
    }

    #[test]
    fn reference_plan_covers_ten_cells_in_order() {
        let plan = full_submission().plan(&CellMap::reference());

        let cells: Vec<String> = plan.iter().map(|w| w.cell.to_string()).collect();
        assert_eq!(
            cells,
            vec!["A2", "D2", "J2", "E7", "F7", "H7", "J7", "D12", "H12", "D17"]
        );

        assert_eq!(plan[0].value, CellValue::Text("山田太郎".to_string()));
        assert_eq!(plan[3].value, CellValue::Text("23.18".to_string()));
        assert_eq!(plan[4].value, CellValue::Number(62.34));
        assert_eq!(plan[5].value, CellValue::Integer(120));
        assert_eq!(plan[6].value, CellValue::Integer(14));
        assert_eq!(
            plan[7].value,
            CellValue::Text("渋谷駅 徒歩5分".to_string())
        );
        assert_eq!(
            plan[9].value,
            CellValue::Text("東京都渋谷区神南１丁目１５－３".to_string())
        );
    }

    #[test]
    fn missing_fields_render_sentinels() {
        let submission = Submission::default();

        assert_eq!(
            submission.render_field(Field::Owner),
            CellValue::Text(OWNER_SENTINEL.to_string())
        );
        for field in [
            Field::Name,
            Field::RoomNumber,
            Field::FloorArea,
            Field::ExclusiveArea,
            Field::TotalUnits,
            Field::FloorCount,
            Field::Station1,
            Field::Station2,
            Field::Address,
        ] {
            assert_eq!(
                submission.render_field(field),
                CellValue::Text(FIELD_SENTINEL.to_string()),
                "{field} should render the plain sentinel"
            );
        }
    }

    #[test]
    fn loan_fields_render_blank_when_absent() {
        let submission = Submission::default();
        assert_eq!(submission.render_field(Field::LoanAmount), CellValue::Blank);
        assert_eq!(submission.render_field(Field::LoanDate), CellValue::Blank);
    }

    #[test]
    fn loan_fields_render_typed_values_when_mapped() {
        let map = CellMap::from_entries([("loan_amount", "B20"), ("loan_date", "C20")]).unwrap();
        let plan = full_submission().plan(&map);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].field, Field::LoanAmount);
        assert_eq!(plan[0].value, CellValue::Integer(1980));
        assert_eq!(plan[1].field, Field::LoanDate);
        assert_eq!(
            plan[1].value,
            CellValue::Date(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap())
        );
    }

    #[test]
    fn station_cells_use_walk_descriptors() {
        let submission = full_submission();
        assert_eq!(
            submission.render_field(Field::Station2),
            CellValue::Text("原宿駅 徒歩12分".to_string())
        );
    }
}
