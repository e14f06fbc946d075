//! PUT /api/edit_point

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
    routes::{points::point_request::EditPointQuery, request_id},
};

#[instrument(
    name = "edit_point_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name, id = q.point_id)
)]
pub async fn edit_point(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<EditPointQuery>,
) -> AppResult<Response> {
    debug!(request_id = %request_id(&headers), "edit_point: start");

    state
        .search
        .edit_point(&q.collection_name, q.point_id, &q.new_title, &q.new_content)
        .await?;

    Ok(Output::new(Message {
        message: "Point updated successfully",
    })
    .into_response_with_status(StatusCode::OK))
}
