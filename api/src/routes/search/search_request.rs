use serde::Deserialize;

/// Query of `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub collection_name: String,
    pub query: String,
    pub top_k: u64,
}
