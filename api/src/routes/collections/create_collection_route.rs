//! POST /api/create_collection

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{Message, Output},
    },
    error_handler::AppResult,
    routes::{collections::collection_request::CreateCollectionQuery, request_id},
};

/// Creates a collection sized to the embedding model.
///
/// # Example
/// ```bash
/// curl -X POST 'http://127.0.0.1:7861/api/create_collection?collection_name=docs&distance=cosine'
/// ```
#[instrument(
    name = "create_collection_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name)
)]
pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<CreateCollectionQuery>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), distance = %q.distance, "create_collection: start");

    state
        .search
        .create_collection(&q.collection_name, &q.distance)
        .await?;

    Ok(Output::new(Message {
        message: "Collection created successfully",
    })
    .into_response_with_status(StatusCode::OK))
}
