use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use esbmap_core::{match_details, MatchDetail, MatchSummary};
use esbmap_loader::write_matches_csv;

use crate::middleware::RequestId;

use super::view::{load_view, parse_query, ViewQuery};
use super::{ApiError, ApiResponse, AppState};

const EXPORT_FILENAME: &str = "esb_matches_filtered.csv";

pub(super) async fn list_matches(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<MatchDetail>>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let view = load_view(&state, &query, &req_id.0).await?;
    Ok(Json(ApiResponse::new(match_details(&view.matches), req_id.0)))
}

pub(super) async fn match_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MatchSummary>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let view = load_view(&state, &query, &req_id.0).await?;
    Ok(Json(ApiResponse::new(
        MatchSummary::from_matches(&view.matches),
        req_id.0,
    )))
}

/// Filtered matches as a CSV download, in the match file's own column layout.
pub(super) async fn export_matches(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let view = load_view(&state, &query, &req_id.0).await?;

    let mut body = Vec::new();
    write_matches_csv(&view.matches, &mut body).map_err(|e| {
        tracing::error!(error = %e, "match export failed");
        ApiError::new(req_id.0.clone(), "internal_error", "match export failed")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}
