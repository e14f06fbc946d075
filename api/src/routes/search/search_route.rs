//! GET /api/search

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::Output},
    error_handler::AppResult,
    routes::{request_id, search::search_request::SearchQuery},
};

/// Returns the store's hit list as-is: `{"output": [{id, version, score, payload}, ...]}`.
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:7861/api/search?collection_name=docs&query=rust%20traits&top_k=5'
/// ```
#[instrument(
    name = "search_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name, top_k = q.top_k)
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<SearchQuery>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(%request_id, query = %q.query, "search: start");

    let hits = state
        .search
        .search(&q.collection_name, &q.query, q.top_k)
        .await?;

    debug!(%request_id, hits = hits.len(), "search: success");
    Ok(Output::new(hits).into_response_with_status(StatusCode::OK))
}
