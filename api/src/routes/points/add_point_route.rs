//! POST /api/add_point

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{
        points::{point_request::AddPointQuery, point_response::AddPointResponse},
        request_id,
    },
};

/// Embeds `content` and stores `{title, text}` under a fresh id.
///
/// Unlike the other routes the body is not wrapped in `output`.
#[instrument(
    name = "add_point_route",
    skip(state, headers, q),
    fields(collection = %q.collection_name)
)]
pub async fn add_point(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<AddPointQuery>,
) -> Response {
    debug!(request_id = %request_id(&headers), "add_point: start");

    match state
        .search
        .add_point(&q.collection_name, &q.title, &q.content)
        .await
    {
        Ok(id) => (
            StatusCode::OK,
            Json(AddPointResponse {
                message: "Upsert successful",
                id,
            }),
        )
            .into_response(),
        Err(err) => AppError::from(err).into_bare_response(),
    }
}
