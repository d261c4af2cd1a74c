use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use esbmap_core::{ColumnProjection, DatasetCounts, SourceKind};
use serde::Serialize;

use crate::middleware::RequestId;

use super::view::{load_bundle, parse_query, resolve_filter, ViewQuery};
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct SourceItem {
    source: SourceKind,
    records: usize,
    /// Expected columns the source header actually carried.
    columns: ColumnProjection,
}

#[derive(Debug, Serialize)]
pub(super) struct DatasetsData {
    counts: DatasetCounts,
    sources: Vec<SourceItem>,
}

pub(super) async fn list_datasets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DatasetsData>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let filter = resolve_filter(&state, &query, &req_id.0)?;
    let bundle = load_bundle(&state, &query, &req_id.0).await?;

    let filtered = filter.apply(&bundle.matches);
    let sources = SourceKind::ALL
        .iter()
        .map(|&kind| SourceItem {
            source: kind,
            records: bundle.len_of(kind),
            columns: bundle.projection(kind).clone(),
        })
        .collect();

    Ok(Json(ApiResponse::new(
        DatasetsData {
            counts: DatasetCounts::new(&bundle, &filtered),
            sources,
        },
        req_id.0,
    )))
}
