use serde::Deserialize;

/// Query of `POST /api/create_collection`.
#[derive(Debug, Deserialize)]
pub struct CreateCollectionQuery {
    pub collection_name: String,
    /// One of `cosine`, `dot`, `euclid`.
    pub distance: String,
}

/// Query of `DELETE /api/delete_collection`.
#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    pub collection_name: String,
}
