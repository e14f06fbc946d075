use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use vector_index::IndexError;

use crate::core::app_state::ConfigError;
use crate::core::http::response_envelope::{ErrorMessage, Output};

/// Literal body for every failure that is not a known conflict.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{0}")]
    BadRequest(String),

    /// Error mapped from the search layer with a specific status.
    #[error("{message}")]
    Http { status: StatusCode, message: String },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorMessage {
        match self {
            AppError::BadRequest(_) | AppError::Http { .. } => ErrorMessage::new(self.to_string()),
            // startup-only, never shown to clients verbatim
            _ => ErrorMessage::new(UNEXPECTED_ERROR),
        }
    }

    /// `{"error": ...}` without the `output` wrapper (used by `add_point`).
    pub fn into_bare_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        Output::new(self.body()).into_response_with_status(self.status_code())
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Maps search-layer errors onto the structured messages clients rely on.
///
/// Unknown failures are logged with their cause and reported generically.
impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::AlreadyExists(_) => AppError::Http {
                status: StatusCode::CONFLICT,
                message: "Collection already exists".into(),
            },
            IndexError::CollectionNotFound(_) => AppError::Http {
                status: StatusCode::NOT_FOUND,
                message: "Collection is not exists".into(),
            },
            IndexError::PointNotFound { .. } => AppError::Http {
                status: StatusCode::NOT_FOUND,
                message: "Point not found".into(),
            },
            IndexError::InvalidDistance(_) => {
                AppError::BadRequest("Distance must in list [cosine, dot, euclid]".into())
            }
            IndexError::MissingTextColumn => {
                AppError::BadRequest("Uploaded file has no `text` column".into())
            }
            IndexError::Csv(e) => AppError::BadRequest(format!("Invalid CSV file: {e}")),
            other => {
                error!(error = %other, "Unexpected search failure");
                AppError::Http {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: UNEXPECTED_ERROR.into(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_keep_their_literal_messages() {
        let cases = [
            (
                IndexError::AlreadyExists("c".into()),
                StatusCode::CONFLICT,
                "Collection already exists",
            ),
            (
                IndexError::CollectionNotFound("c".into()),
                StatusCode::NOT_FOUND,
                "Collection is not exists",
            ),
            (
                IndexError::PointNotFound {
                    collection: "c".into(),
                    id: 3,
                },
                StatusCode::NOT_FOUND,
                "Point not found",
            ),
            (
                IndexError::Qdrant("connection refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                UNEXPECTED_ERROR,
            ),
        ];

        for (err, status, message) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status_code(), status);
            assert_eq!(app.body().error, message);
        }
    }

    #[test]
    fn bad_input_is_400() {
        let app: AppError = IndexError::InvalidDistance("l1".into()).into();
        assert_eq!(app.status_code(), StatusCode::BAD_REQUEST);
        let app: AppError = IndexError::MissingTextColumn.into();
        assert_eq!(app.status_code(), StatusCode::BAD_REQUEST);
    }
}
