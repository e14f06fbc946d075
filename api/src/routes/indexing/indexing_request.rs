use serde::Deserialize;

/// Query of `POST /api/indexing_data`; the CSV itself is multipart field [`FILE_FIELD`].
#[derive(Debug, Deserialize)]
pub struct IndexingQuery {
    pub collection_name: String,
}

pub const FILE_FIELD: &str = "file";
