pub mod collections;
pub mod indexing;
pub mod points;
pub mod search;

use axum::http::HeaderMap;

/// `X-Request-Id` of the incoming request, or `-`.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
