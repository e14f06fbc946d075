use serde::Serialize;

/// Unwrapped body of `POST /api/add_point`.
#[derive(Debug, Serialize)]
pub struct AddPointResponse {
    pub message: &'static str,
    /// Id assigned to the new point.
    pub id: u64,
}
