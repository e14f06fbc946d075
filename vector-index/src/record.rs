//! Core data models used by the library.

use serde::Serialize;
use serde_json::{Map, Value};

/// A point ready to be written: integer id, dense vector, JSON payload.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: Map<String, Value>,
}

impl IndexPoint {
    /// Payload shape used by single-point add/edit: `{title, text}`.
    pub fn titled(id: u64, vector: Vec<f32>, title: &str, text: &str) -> Self {
        let mut payload = Map::new();
        payload.insert("title".into(), Value::String(title.to_string()));
        payload.insert("text".into(), Value::String(text.to_string()));
        Self {
            id,
            vector,
            payload,
        }
    }
}

/// A point read back from the store (vector omitted).
#[derive(Clone, Debug, PartialEq)]
pub struct StoredPoint {
    pub id: u64,
    pub payload: Map<String, Value>,
}

/// Point id as reported by the store.
///
/// Points written by this service always use integers, but a collection
/// may also hold UUID-keyed points written by other clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HitId {
    Num(u64),
    Uuid(String),
}

/// A single similarity hit, as returned by the vector database.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredHit {
    pub id: Option<HitId>,
    pub version: u64,
    pub score: f32,
    pub payload: Value,
}
