use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Html,
    Extension, Json,
};
use esbmap_map::MapDocument;

use crate::middleware::RequestId;

use super::view::{load_view, parse_query, ViewQuery};
use super::{ApiError, ApiResponse, AppState};

async fn build_document(
    state: &AppState,
    query: Result<Query<ViewQuery>, QueryRejection>,
    req_id: &str,
) -> Result<MapDocument, ApiError> {
    let query = parse_query(query, req_id)?;
    let view = load_view(state, &query, req_id).await?;
    Ok(esbmap_map::build(
        &view.bundle.esb,
        &view.bundle.scraper,
        &view.matches,
    ))
}

/// The standalone Leaflet page.
pub(super) async fn map_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let document = build_document(&state, query, &req_id.0).await?;
    Ok(Html(esbmap_map::render_html(&document)))
}

pub(super) async fn map_document(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<MapDocument>>, ApiError> {
    let document = build_document(&state, query, &req_id.0).await?;
    Ok(Json(ApiResponse::new(document, req_id.0)))
}
