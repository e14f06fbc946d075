use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{"output": T}` wrapper used by every route except `add_point`.
#[derive(Serialize)]
pub struct Output<T>
where
    T: Serialize,
{
    pub output: T,
}

impl<T> Output<T>
where
    T: Serialize,
{
    pub fn new(output: T) -> Self {
        Self { output }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// `{"message": "..."}` success body.
#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `{"error": "..."}` failure body.
#[derive(Serialize)]
pub struct ErrorMessage {
    pub error: String,
    /// Query parameter or form field the error refers to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }
}
