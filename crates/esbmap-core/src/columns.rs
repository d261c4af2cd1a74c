//! Column catalogue for the three input sources and the projection of an
//! expected column list onto a concrete CSV header.

use serde::Serialize;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const BRAND_NAME: &str = "brandName";
pub const ADDRESS: &str = "address";

pub const LATITUDE_ESB: &str = "latitude_esb";
pub const LONGITUDE_ESB: &str = "longitude_esb";
pub const LATITUDE_PULAU: &str = "latitude_pulau";
pub const LONGITUDE_PULAU: &str = "longitude_pulau";
pub const BRAND_NAME_ESB: &str = "brandName_esb";
pub const BRAND_NAME_PULAU: &str = "brandName_pulau";
pub const MATCH_CONFIDENCE: &str = "match_confidence";
pub const DISTANCE_M: &str = "distance_m";
pub const EXACT_BRAND_MATCH: &str = "exact_brand_match";
pub const BRANCH_NAME_ESB: &str = "branchName_esb";
pub const MATCH_LEVEL: &str = "match_level";
pub const ADDRESS_COMMON_WORDS: &str = "address_common_words";

/// Expected columns of the ESB and Scraper point sources.
pub const BASE_COLUMNS: &[&str] = &[LATITUDE, LONGITUDE, BRAND_NAME, ADDRESS];

/// Expected columns of the match source. The first eight feed the map; the
/// trailing four are only read by the analytics and detail views.
pub const MATCH_COLUMNS: &[&str] = &[
    LATITUDE_ESB,
    LONGITUDE_ESB,
    LATITUDE_PULAU,
    LONGITUDE_PULAU,
    BRAND_NAME_ESB,
    BRAND_NAME_PULAU,
    MATCH_CONFIDENCE,
    DISTANCE_M,
    EXACT_BRAND_MATCH,
    BRANCH_NAME_ESB,
    MATCH_LEVEL,
    ADDRESS_COMMON_WORDS,
];

/// The expected columns actually present in a source header, kept in
/// expected order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnProjection {
    columns: Vec<&'static str>,
}

impl ColumnProjection {
    /// Intersect `expected` with `header`. Header names are compared exactly;
    /// duplicates in the header do not duplicate the projection.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(expected: &[&'static str], header: &[S]) -> Self {
        let columns = expected
            .iter()
            .copied()
            .filter(|col| header.iter().any(|h| h.as_ref() == *col))
            .collect();
        Self { columns }
    }

    /// A projection that loaded every expected column.
    #[must_use]
    pub fn full(expected: &[&'static str]) -> Self {
        Self {
            columns: expected.to_vec(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| *c == column)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_keeps_expected_order_not_header_order() {
        let header = ["address", "extra", "latitude", "longitude"];
        let projection = ColumnProjection::resolve(BASE_COLUMNS, &header);
        assert_eq!(projection.columns(), &["latitude", "longitude", "address"]);
    }

    #[test]
    fn resolve_with_no_overlap_is_empty() {
        let header = vec!["lat".to_string(), "lng".to_string()];
        let projection = ColumnProjection::resolve(BASE_COLUMNS, &header);
        assert!(projection.is_empty());
        assert_eq!(projection.len(), 0);
    }

    #[test]
    fn resolve_is_case_sensitive() {
        let header = ["Latitude", "brandname"];
        assert!(ColumnProjection::resolve(BASE_COLUMNS, &header).is_empty());
    }

    #[test]
    fn resolve_ignores_duplicate_header_names() {
        let header = ["latitude", "latitude", "longitude"];
        let projection = ColumnProjection::resolve(BASE_COLUMNS, &header);
        assert_eq!(projection.len(), 2);
    }

    #[test]
    fn full_projection_contains_every_match_column() {
        let projection = ColumnProjection::full(MATCH_COLUMNS);
        assert!(projection.contains(MATCH_CONFIDENCE));
        assert!(projection.contains(ADDRESS_COMMON_WORDS));
        assert!(!projection.contains(LATITUDE));
    }

    #[test]
    fn projection_serializes_as_plain_list() {
        let projection = ColumnProjection::resolve(BASE_COLUMNS, &["brandName"]);
        let json = serde_json::to_string(&projection).unwrap();
        assert_eq!(json, r#"["brandName"]"#);
    }
}
