//! Unified error types for the crate.

use embed_service::EmbedError;
use thiserror::Error;

/// Top-level error for vector-index operations.
///
/// The first group are the "known conflict" conditions the HTTP layer
/// reports with a structured message; everything else is unexpected.
#[derive(Debug, Error)]
pub enum IndexError {
    /// `create_collection` on a name that is already taken.
    #[error("collection `{0}` already exists")]
    AlreadyExists(String),

    /// Any operation addressed to a collection that does not exist.
    #[error("collection `{0}` does not exist")]
    CollectionNotFound(String),

    /// `edit_point` on an id that has no point.
    #[error("point {id} not found in collection `{collection}`")]
    PointNotFound { collection: String, id: u64 },

    /// Distance name outside of cosine / dot / euclid.
    #[error("unsupported distance `{0}`, expected one of [cosine, dot, euclid]")]
    InvalidDistance(String),

    /// Uploaded table has no `text` column to embed.
    #[error("table has no `text` column")]
    MissingTextColumn,

    /// Malformed CSV upload.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Embedding backend failure.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Mismatch between a vector and the collection dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl From<EmbedError> for IndexError {
    fn from(err: EmbedError) -> Self {
        match err {
            EmbedError::Dimension { got, want } => IndexError::VectorSizeMismatch { got, want },
            other => IndexError::Embedding(other.to_string()),
        }
    }
}
