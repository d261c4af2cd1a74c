//! Aggregate and per-row views over a (filtered) match collection.

use std::cmp::Ordering;

use serde::Serialize;

use crate::records::{Collection, DatasetBundle, MatchRecord};

/// Headline numbers for the filtered match set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_count: usize,
    /// Matches flagged `exact_brand_match`; zero when the column is absent.
    pub exact_matches: usize,
    pub mean_distance_m: Option<f64>,
    pub mean_confidence: Option<f64>,
}

impl MatchSummary {
    #[must_use]
    pub fn from_matches(matches: &Collection<MatchRecord>) -> Self {
        let exact_matches = matches
            .iter()
            .filter(|m| m.exact_brand_match == Some(true))
            .count();

        Self {
            match_count: matches.len(),
            exact_matches,
            mean_distance_m: mean(matches.iter().filter_map(|m| m.distance_m)),
            mean_confidence: mean(matches.iter().filter_map(|m| m.match_confidence)),
        }
    }
}

// Nulls are already skipped by the caller's filter_map.
#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f32>) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), v| {
        (sum + f64::from(v), count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// One row of the match detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetail {
    #[serde(rename = "brandName_esb")]
    pub brand_name_esb: Option<String>,
    #[serde(rename = "brandName_pulau")]
    pub brand_name_pulau: Option<String>,
    pub match_confidence: Option<f32>,
    pub distance_m: Option<f32>,
}

/// Detail rows sorted by confidence, highest first. Rows without a
/// confidence sort last and keep their file order among themselves.
#[must_use]
pub fn match_details(matches: &Collection<MatchRecord>) -> Vec<MatchDetail> {
    let mut rows: Vec<MatchDetail> = matches
        .iter()
        .map(|m| MatchDetail {
            brand_name_esb: m.brand_name_esb.clone(),
            brand_name_pulau: m.brand_name_pulau.clone(),
            match_confidence: m.match_confidence,
            distance_m: m.distance_m,
        })
        .collect();

    rows.sort_by(|a, b| match (a.match_confidence, b.match_confidence) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}

/// Record counts shown next to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetCounts {
    pub esb: usize,
    pub scraper: usize,
    pub filtered_matches: usize,
}

impl DatasetCounts {
    #[must_use]
    pub fn new(bundle: &DatasetBundle, filtered_matches: &Collection<MatchRecord>) -> Self {
        Self {
            esb: bundle.esb.len(),
            scraper: bundle.scraper.len(),
            filtered_matches: filtered_matches.len(),
        }
    }
}
