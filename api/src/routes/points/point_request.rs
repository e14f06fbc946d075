use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddPointQuery {
    pub collection_name: String,
    pub title: String,
    /// Text that gets embedded and stored as `text`.
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePointQuery {
    pub collection_name: String,
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct EditPointQuery {
    pub collection_name: String,
    pub point_id: u64,
    pub new_title: String,
    pub new_content: String,
}
