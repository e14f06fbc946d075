//! POST /api/indexing_data

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, error, info, instrument, warn};
use vector_index::Table;

use crate::{
    core::{app_state::AppState, http::response_envelope::Output},
    error_handler::{AppError, AppResult},
    routes::{
        indexing::{
            indexing_request::{FILE_FIELD, IndexingQuery},
            indexing_response::IndexingResponse,
        },
        request_id,
    },
};

/// Embeds and upserts every row of the uploaded CSV (needs a `text` column).
///
/// Row `i` becomes point `i` with the whole row as payload. A batch that
/// fails does not stop the others; the per-batch report is returned either
/// way, with status 500 when any batch failed.
///
/// # Example
/// ```bash
/// curl -X POST 'http://127.0.0.1:7861/api/indexing_data?collection_name=docs' \
///   -F 'file=@articles.csv'
/// ```
#[instrument(
    name = "indexing_data_route",
    skip(state, headers, q, multipart),
    fields(collection = %q.collection_name)
)]
pub async fn indexing_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<IndexingQuery>,
    multipart: Multipart,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(%request_id, "indexing_data: start");

    let bytes = read_file_field(multipart).await?;
    let table = Table::from_csv(&bytes)?;
    info!(%request_id, rows = table.len(), columns = ?table.columns(), "indexing_data: table parsed");

    let report = state.search.index_table(&q.collection_name, &table).await?;

    if report.is_complete() {
        Ok(Output::new(IndexingResponse {
            message: Some("Upsert successful"),
            error: None,
            report,
        })
        .into_response_with_status(StatusCode::OK))
    } else {
        warn!(%request_id, failed = report.failed_batches, "indexing_data: partial failure");
        Ok(Output::new(IndexingResponse {
            message: None,
            error: Some("Some batches failed to upsert"),
            report,
        })
        .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

/// Returns the bytes of the `file` field; other fields are ignored.
async fn read_file_field(mut multipart: Multipart) -> AppResult<Vec<u8>> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        error!(error = %err, "Failed to read multipart field");
        AppError::BadRequest(format!("Invalid multipart data: {err}"))
    })? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let data = field.bytes().await.map_err(|err| {
            error!(error = %err, "Failed to read file data");
            AppError::BadRequest(format!("Could not read uploaded file: {err}"))
        })?;
        return Ok(data.to_vec());
    }

    Err(AppError::BadRequest(format!(
        "Multipart field `{FILE_FIELD}` is required"
    )))
}
