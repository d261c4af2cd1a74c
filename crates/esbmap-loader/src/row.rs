//! Per-row conversion from CSV cells to typed records.
//!
//! Conversion is a pure `row -> Some(record) | None` function so a defective
//! row is skipped without touching the rest of the batch.

use esbmap_core::columns::{
    ADDRESS, ADDRESS_COMMON_WORDS, BRANCH_NAME_ESB, BRAND_NAME, BRAND_NAME_ESB, BRAND_NAME_PULAU,
    DISTANCE_M, EXACT_BRAND_MATCH, LATITUDE, LATITUDE_ESB, LATITUDE_PULAU, LONGITUDE,
    LONGITUDE_ESB, LONGITUDE_PULAU, MATCH_CONFIDENCE, MATCH_LEVEL,
};
use esbmap_core::{ColumnProjection, LocationRecord, MatchRecord, Record};

/// Cell spellings read as null, the same set pandas treats as NA by default.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Header positions of the projected columns.
#[derive(Debug, Clone)]
pub(crate) struct ColumnPositions {
    positions: Vec<(&'static str, usize)>,
}

impl ColumnPositions {
    pub(crate) fn new(projection: &ColumnProjection, header: &csv::StringRecord) -> Self {
        let positions = projection
            .columns()
            .iter()
            .filter_map(|col| header.iter().position(|h| h == *col).map(|idx| (*col, idx)))
            .collect();
        Self { positions }
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, idx)| *idx)
    }
}

/// One CSV record viewed through the projected columns. Columns outside the
/// projection, and cells past the end of a short row, read as null.
pub(crate) struct Row<'r> {
    cells: &'r csv::StringRecord,
    positions: &'r ColumnPositions,
}

impl<'r> Row<'r> {
    pub(crate) fn new(cells: &'r csv::StringRecord, positions: &'r ColumnPositions) -> Self {
        Self { cells, positions }
    }

    fn raw(&self, column: &str) -> Option<&'r str> {
        let idx = self.positions.index_of(column)?;
        let cell = self.cells.get(idx)?.trim();
        (!NULL_TOKENS.contains(&cell)).then_some(cell)
    }

    pub(crate) fn text(&self, column: &str) -> Option<String> {
        self.raw(column).map(str::to_string)
    }

    /// Numeric cells are narrowed to `f32`; unparseable or non-finite values
    /// read as null.
    pub(crate) fn number(&self, column: &str) -> Option<f32> {
        self.raw(column)?
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
    }

    pub(crate) fn flag(&self, column: &str) -> Option<bool> {
        match self.raw(column)? {
            "1" | "1.0" | "true" | "True" | "TRUE" => Some(true),
            "0" | "0.0" | "false" | "False" | "FALSE" => Some(false),
            _ => None,
        }
    }
}

pub(crate) trait FromRow: Record + Sized {
    /// `None` drops the row.
    fn from_row(row: &Row<'_>) -> Option<Self>;
}

impl FromRow for LocationRecord {
    fn from_row(row: &Row<'_>) -> Option<Self> {
        Some(Self {
            latitude: row.number(LATITUDE)?,
            longitude: row.number(LONGITUDE)?,
            brand_name: row.text(BRAND_NAME),
            address: row.text(ADDRESS),
        })
    }
}

impl FromRow for MatchRecord {
    // Null coordinates are kept; the map builder skips them at render time.
    fn from_row(row: &Row<'_>) -> Option<Self> {
        Some(Self {
            latitude_esb: row.number(LATITUDE_ESB),
            longitude_esb: row.number(LONGITUDE_ESB),
            latitude_pulau: row.number(LATITUDE_PULAU),
            longitude_pulau: row.number(LONGITUDE_PULAU),
            brand_name_esb: row.text(BRAND_NAME_ESB),
            brand_name_pulau: row.text(BRAND_NAME_PULAU),
            match_confidence: row.number(MATCH_CONFIDENCE),
            distance_m: row.number(DISTANCE_M),
            exact_brand_match: row.flag(EXACT_BRAND_MATCH),
            branch_name_esb: row.text(BRANCH_NAME_ESB),
            match_level: row.text(MATCH_LEVEL),
            address_common_words: row.number(ADDRESS_COMMON_WORDS),
        })
    }
}

#[cfg(test)]
mod tests {
    use esbmap_core::columns::{BASE_COLUMNS, MATCH_COLUMNS};

    use super::*;

    fn parse<T: FromRow>(header: &[&str], cells: &[&str]) -> Option<T> {
        let header = csv::StringRecord::from(header.to_vec());
        let projection = ColumnProjection::resolve(T::EXPECTED_COLUMNS, &header.iter().collect::<Vec<_>>());
        let positions = ColumnPositions::new(&projection, &header);
        let cells = csv::StringRecord::from(cells.to_vec());
        T::from_row(&Row::new(&cells, &positions))
    }

    #[test]
    fn location_row_reads_projected_columns() {
        let record: LocationRecord = parse(
            &["address", "latitude", "longitude", "brandName"],
            &["Jl. Sudirman 1", "-6.2", "106.8", "Kopi A"],
        )
        .unwrap();
        assert!((record.latitude - -6.2).abs() < 1e-6);
        assert!((record.longitude - 106.8).abs() < 1e-4);
        assert_eq!(record.brand_name.as_deref(), Some("Kopi A"));
        assert_eq!(record.address.as_deref(), Some("Jl. Sudirman 1"));
    }

    #[test]
    fn location_row_without_coordinate_is_dropped() {
        let header = ["latitude", "longitude", "brandName"];
        assert!(parse::<LocationRecord>(&header, &["", "106.8", "A"]).is_none());
        assert!(parse::<LocationRecord>(&header, &["-6.2", "NaN", "A"]).is_none());
        assert!(parse::<LocationRecord>(&header, &["-6.2", "east", "A"]).is_none());
    }

    #[test]
    fn location_row_missing_optional_columns_reads_none() {
        let record: LocationRecord = parse(&["latitude", "longitude"], &["1", "2"]).unwrap();
        assert!(record.brand_name.is_none());
        assert!(record.address.is_none());
    }

    #[test]
    fn null_tokens_in_text_columns_read_as_none() {
        let record: LocationRecord = parse(
            &["latitude", "longitude", "brandName", "address"],
            &["1", "2", "N/A", "  "],
        )
        .unwrap();
        assert!(record.brand_name.is_none());
        assert!(record.address.is_none());
    }

    #[test]
    fn short_row_reads_trailing_cells_as_none() {
        let record: LocationRecord = parse(
            &["latitude", "longitude", "brandName", "address"],
            &["1", "2"],
        )
        .unwrap();
        assert!(record.brand_name.is_none());
    }

    #[test]
    fn match_row_keeps_null_coordinates() {
        let record: MatchRecord = parse(
            &["latitude_esb", "longitude_esb", "match_confidence", "distance_m"],
            &["", "106.8", "0.91", "140"],
        )
        .unwrap();
        assert!(record.latitude_esb.is_none());
        assert_eq!(record.longitude_esb, Some(106.8));
        assert_eq!(record.match_confidence, Some(0.91));
        assert_eq!(record.distance_m, Some(140.0));
        assert!(record.endpoints().is_none());
    }

    #[test]
    fn match_row_parses_detail_columns() {
        let record: MatchRecord = parse(
            &["exact_brand_match", "branchName_esb", "match_level", "address_common_words"],
            &["True", "Cabang Senayan", "exact", "3"],
        )
        .unwrap();
        assert_eq!(record.exact_brand_match, Some(true));
        assert_eq!(record.branch_name_esb.as_deref(), Some("Cabang Senayan"));
        assert_eq!(record.match_level.as_deref(), Some("exact"));
        assert_eq!(record.address_common_words, Some(3.0));
    }

    #[test]
    fn flag_rejects_unknown_spelling() {
        let record: MatchRecord = parse(&["exact_brand_match"], &["maybe"]).unwrap();
        assert!(record.exact_brand_match.is_none());
    }

    #[test]
    fn expected_columns_match_catalogue() {
        assert_eq!(LocationRecord::EXPECTED_COLUMNS, BASE_COLUMNS);
        assert_eq!(MatchRecord::EXPECTED_COLUMNS, MATCH_COLUMNS);
    }
}
