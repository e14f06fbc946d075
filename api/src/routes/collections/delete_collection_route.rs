//! DELETE /api/delete_collection

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
    routes::{collections::collection_request::CollectionQuery, request_id},
};

#[instrument(
    name = "delete_collection_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name)
)]
pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<CollectionQuery>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), "delete_collection: start");

    state.search.delete_collection(&q.collection_name).await?;

    Ok(Output::new(Message {
        message: "Collection deleted successfully",
    })
    .into_response_with_status(StatusCode::OK))
}
