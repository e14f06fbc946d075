//! POST /api/delete_point

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
    routes::{points::point_request::DeletePointQuery, request_id},
};

/// Deleting an id that holds no point still succeeds.
#[instrument(
    name = "delete_point_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name, id = q.id)
)]
pub async fn delete_point(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<DeletePointQuery>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), "delete_point: start");

    state.search.delete_point(&q.collection_name, q.id).await?;

    Ok(Output::new(Message {
        message: "Point deleted successfully",
    })
    .into_response_with_status(StatusCode::OK))
}
