use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::extract::{rejection::QueryRejection, Query};
use esbmap_core::{Collection, CoreError, DatasetBundle, MatchFilter, MatchRecord};
use esbmap_loader::LoadOutcome;
use serde::Deserialize;

use super::{ApiError, AppState};

/// Per-request overrides of the configured load cap and match filter.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ViewQuery {
    pub max_points: Option<usize>,
    pub min_confidence: Option<f32>,
    pub max_distance: Option<f32>,
}

impl ViewQuery {
    fn max_points(&self, state: &AppState) -> Result<NonZeroUsize, CoreError> {
        match self.max_points {
            Some(n) => NonZeroUsize::new(n).ok_or(CoreError::InvalidMaxPoints),
            None => Ok(state.max_points),
        }
    }

    fn match_filter(&self, state: &AppState) -> Result<MatchFilter, CoreError> {
        MatchFilter::new(
            self.min_confidence
                .unwrap_or(state.match_filter.min_confidence()),
            self.max_distance
                .unwrap_or(state.match_filter.max_distance()),
        )
    }
}

/// A loaded bundle plus the match rows that passed the request's filter.
pub(super) struct View {
    pub bundle: Arc<DatasetBundle>,
    pub matches: Collection<MatchRecord>,
}

pub(super) fn parse_query(
    query: Result<Query<ViewQuery>, QueryRejection>,
    req_id: &str,
) -> Result<ViewQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::new(req_id, "bad_request", e.body_text()))
}

fn bad_request(req_id: &str, error: &CoreError) -> ApiError {
    ApiError::new(req_id, "bad_request", error.to_string())
}

pub(super) fn resolve_filter(
    state: &AppState,
    query: &ViewQuery,
    req_id: &str,
) -> Result<MatchFilter, ApiError> {
    query
        .match_filter(state)
        .map_err(|e| bad_request(req_id, &e))
}

async fn run_load(
    state: &AppState,
    max_points: NonZeroUsize,
    req_id: &str,
) -> Result<LoadOutcome, ApiError> {
    let loader = Arc::clone(&state.loader);
    tokio::task::spawn_blocking(move || loader.load(max_points))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "dataset load task failed");
            ApiError::new(req_id, "internal_error", "dataset load task failed")
        })
}

/// Load the bundle as-is. Only a failed load is an error; empty or
/// schema-mismatched sources come back as empty collections.
pub(super) async fn load_bundle(
    state: &AppState,
    query: &ViewQuery,
    req_id: &str,
) -> Result<Arc<DatasetBundle>, ApiError> {
    let max_points = query
        .max_points(state)
        .map_err(|e| bad_request(req_id, &e))?;
    let outcome = run_load(state, max_points, req_id).await?;
    match outcome.error {
        Some(e) => Err(ApiError::new(req_id, "load_failed", e.to_string())),
        None => Ok(outcome.bundle),
    }
}

/// Load the bundle, require both point sources to have records, and apply
/// the match filter.
pub(super) async fn load_view(
    state: &AppState,
    query: &ViewQuery,
    req_id: &str,
) -> Result<View, ApiError> {
    let max_points = query
        .max_points(state)
        .map_err(|e| bad_request(req_id, &e))?;
    let filter = resolve_filter(state, query, req_id)?;

    let bundle = run_load(state, max_points, req_id)
        .await?
        .into_primary()
        .map_err(|e| ApiError::new(req_id, "load_failed", e.to_string()))?;
    let matches = filter.apply(&bundle.matches);
    Ok(View { bundle, matches })
}
