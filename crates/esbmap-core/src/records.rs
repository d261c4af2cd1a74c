//! Record types shared by the loader, the map builder and the outer surfaces.

use serde::{Serialize, Serializer};

use crate::columns::{ColumnProjection, BASE_COLUMNS, MATCH_COLUMNS};

/// Which of the three input sources a collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Esb,
    Scraper,
    Matches,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Esb, SourceKind::Scraper, SourceKind::Matches];

    #[must_use]
    pub fn expected_columns(self) -> &'static [&'static str] {
        match self {
            SourceKind::Esb | SourceKind::Scraper => BASE_COLUMNS,
            SourceKind::Matches => MATCH_COLUMNS,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Esb => write!(f, "esb"),
            SourceKind::Scraper => write!(f, "scraper"),
            SourceKind::Matches => write!(f, "matches"),
        }
    }
}

/// A WGS84 coordinate, widened to `f64` for display math.
///
/// Serializes as a `[latitude, longitude]` pair, the order Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within the latitude/longitude ranges a map can place.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.latitude, self.longitude].serialize(serializer)
    }
}

/// Records that are read through a fixed list of expected columns.
pub trait Record {
    const EXPECTED_COLUMNS: &'static [&'static str];
}

/// One ESB or Scraper point. Coordinates are never null once a record
/// leaves the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub latitude: f32,
    pub longitude: f32,
    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,
    pub address: Option<String>,
}

impl LocationRecord {
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(f64::from(self.latitude), f64::from(self.longitude))
    }
}

impl Record for LocationRecord {
    const EXPECTED_COLUMNS: &'static [&'static str] = BASE_COLUMNS;
}

/// One precomputed ESB↔Scraper linkage. Every field is optional because the
/// match file is read through whatever columns it actually carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchRecord {
    pub latitude_esb: Option<f32>,
    pub longitude_esb: Option<f32>,
    pub latitude_pulau: Option<f32>,
    pub longitude_pulau: Option<f32>,
    #[serde(rename = "brandName_esb")]
    pub brand_name_esb: Option<String>,
    #[serde(rename = "brandName_pulau")]
    pub brand_name_pulau: Option<String>,
    pub match_confidence: Option<f32>,
    pub distance_m: Option<f32>,
    pub exact_brand_match: Option<bool>,
    #[serde(rename = "branchName_esb")]
    pub branch_name_esb: Option<String>,
    pub match_level: Option<String>,
    pub address_common_words: Option<f32>,
}

impl MatchRecord {
    /// The ESB-side and Scraper-side endpoints, or `None` when any of the
    /// four coordinates is missing.
    #[must_use]
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        let esb = GeoPoint::new(
            f64::from(self.latitude_esb?),
            f64::from(self.longitude_esb?),
        );
        let pulau = GeoPoint::new(
            f64::from(self.latitude_pulau?),
            f64::from(self.longitude_pulau?),
        );
        Some((esb, pulau))
    }
}

impl Record for MatchRecord {
    const EXPECTED_COLUMNS: &'static [&'static str] = MATCH_COLUMNS;
}

/// The records of one source together with the columns they were read
/// through.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    projection: ColumnProjection,
    records: Vec<T>,
}

impl<T> Collection<T> {
    #[must_use]
    pub fn new(projection: ColumnProjection, records: Vec<T>) -> Self {
        Self {
            projection,
            records,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(ColumnProjection::default(), Vec::new())
    }

    #[must_use]
    pub fn projection(&self) -> &ColumnProjection {
        &self.projection
    }

    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A new collection over the same projection holding only the records
    /// that satisfy `keep`.
    #[must_use]
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        Self::new(
            self.projection.clone(),
            self.records.iter().filter(|r| keep(r)).cloned().collect(),
        )
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Record> From<Vec<T>> for Collection<T> {
    fn from(records: Vec<T>) -> Self {
        Self::new(ColumnProjection::full(T::EXPECTED_COLUMNS), records)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The three collections produced by one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetBundle {
    pub esb: Collection<LocationRecord>,
    pub scraper: Collection<LocationRecord>,
    pub matches: Collection<MatchRecord>,
}

impl DatasetBundle {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Both point sources produced at least one record. Without them there is
    /// nothing to draw, so callers halt instead of rendering.
    #[must_use]
    pub fn has_primary_data(&self) -> bool {
        !self.esb.is_empty() && !self.scraper.is_empty()
    }

    #[must_use]
    pub fn projection(&self, kind: SourceKind) -> &ColumnProjection {
        match kind {
            SourceKind::Esb => self.esb.projection(),
            SourceKind::Scraper => self.scraper.projection(),
            SourceKind::Matches => self.matches.projection(),
        }
    }

    #[must_use]
    pub fn len_of(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::Esb => self.esb.len(),
            SourceKind::Scraper => self.scraper.len(),
            SourceKind::Matches => self.matches.len(),
        }
    }
}
