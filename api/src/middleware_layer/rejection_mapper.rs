use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::core::http::response_envelope::{ErrorMessage, Output};

/// Extractor rejections are short; anything larger is not worth echoing back.
const REJECTION_BODY_LIMIT: usize = 64 * 1024;

async fn rejection_text(body: Body, status: StatusCode) -> String {
    match axum::body::to_bytes(body, REJECTION_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(err) => {
            warn!(error = %err, status = status.as_u16(), "Rejection body could not be read");
            status.canonical_reason().unwrap_or("Bad Request").to_string()
        }
    }
}

/// Pulls the parameter name out of serde messages such as ``missing field `top_k` ``.
fn guess_field(msg: &str) -> Option<String> {
    let start = msg.find('`')? + 1;
    let len = msg[start..].find('`')?;
    Some(msg[start..start + len].to_string())
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", value);
    }
    id
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Rewrites axum's plain-text extractor rejections (bad query string,
/// bad multipart) into the `{"output": {"error": ...}}` envelope.
///
/// Only 400/422 are touched; JSON bodies produced by handlers pass through.
pub async fn rejection_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    if is_json(&parts) {
        return Response::from_parts(parts, body);
    }

    let original = rejection_text(body, status).await;
    let request_id = ensure_request_id(&mut parts);
    debug!(%request_id, status = status.as_u16(), rejection = %original, "Request rejected");

    let field = guess_field(&original);
    let envelope = Output::new(ErrorMessage {
        error: original.clone(),
        field,
    });

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => original.into_bytes(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_taken_from_backticks() {
        assert_eq!(
            guess_field("Failed to deserialize query string: missing field `top_k`"),
            Some("top_k".to_string())
        );
        assert_eq!(guess_field("no backticks here"), None);
    }

    #[tokio::test]
    async fn rejection_text_is_trimmed() {
        let body = Body::from("  missing field `query`\n");
        assert_eq!(
            rejection_text(body, StatusCode::BAD_REQUEST).await,
            "missing field `query`"
        );
    }

    #[tokio::test]
    async fn oversized_rejection_falls_back_to_reason() {
        let body = Body::from(vec![b'x'; REJECTION_BODY_LIMIT + 1]);
        assert_eq!(
            rejection_text(body, StatusCode::UNPROCESSABLE_ENTITY).await,
            "Unprocessable Entity"
        );
    }
}
