use serde::Serialize;
use vector_index::IndexReport;

#[derive(Debug, Serialize)]
pub struct IndexingResponse {
    /// `message` when every batch landed, `error` otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub report: IndexReport,
}
