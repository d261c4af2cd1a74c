use crate::columns::{DISTANCE_M, MATCH_CONFIDENCE};
use crate::error::CoreError;
use crate::records::{Collection, MatchRecord};

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;
pub const DEFAULT_MAX_DISTANCE_M: f32 = 1000.0;

/// Confidence/distance filter applied to the match collection before it
/// reaches the map builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchFilter {
    min_confidence: f32,
    max_distance: f32,
}

impl MatchFilter {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfidence`] when `min_confidence` is not
    /// within `[0, 1]` and [`CoreError::InvalidDistance`] when `max_distance`
    /// is negative or not finite.
    pub fn new(min_confidence: f32, max_distance: f32) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(CoreError::InvalidConfidence(min_confidence));
        }
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(CoreError::InvalidDistance(max_distance));
        }
        Ok(Self {
            min_confidence,
            max_distance,
        })
    }

    #[must_use]
    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    #[must_use]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Whether a single match passes. A null confidence or distance never
    /// passes.
    #[must_use]
    pub fn accepts(&self, record: &MatchRecord) -> bool {
        matches!(
            (record.match_confidence, record.distance_m),
            (Some(confidence), Some(distance))
                if confidence >= self.min_confidence && distance <= self.max_distance
        )
    }

    /// Apply the filter to a loaded match collection.
    ///
    /// A collection that was not read with both `match_confidence` and
    /// `distance_m` cannot be filtered and yields an empty collection.
    #[must_use]
    pub fn apply(&self, matches: &Collection<MatchRecord>) -> Collection<MatchRecord> {
        let projection = matches.projection();
        if !projection.contains(MATCH_CONFIDENCE) || !projection.contains(DISTANCE_M) {
            return Collection::new(projection.clone(), Vec::new());
        }
        matches.filtered(|m| self.accepts(m))
    }
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_distance: DEFAULT_MAX_DISTANCE_M,
        }
    }
}
