//! Unified error type for dataset preparation and scoring.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON; `line` is 1-based for JSONL input, 0 for whole-file JSON.
    #[error("json error in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A row's shape did not match the dataset schema.
    #[error("invalid {kind} row: {source}")]
    Row {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The context lookup has no entry for this record id.
    #[error("no context for record `{id}`")]
    MissingContext { id: String },

    /// A field needed to render a prompt is absent.
    #[error("record `{id}` has no `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("cannot score an empty evaluation set")]
    EmptyEvaluation,

    #[error("{predictions} predictions but {ground_truths} ground truths")]
    LengthMismatch {
        predictions: usize,
        ground_truths: usize,
    },
}
