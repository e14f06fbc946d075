//! In-process [`PointStore`] used by tests and `VECTOR_BACKEND=memory`.
//!
//! Brute-force scoring over every point of a collection. Scores follow the
//! Qdrant conventions: cosine and dot are similarities (higher is better),
//! euclid is a distance (lower is better).

use std::collections::{BTreeMap, HashMap};

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::{DistanceKind, VectorSpace};
use crate::errors::IndexError;
use crate::record::{HitId, IndexPoint, ScoredHit, StoredPoint};
use crate::store::PointStore;

struct MemPoint {
    vector: Vec<f32>,
    payload: Map<String, Value>,
    version: u64,
}

struct MemCollection {
    space: VectorSpace,
    points: BTreeMap<u64, MemPoint>,
    /// Bumped on every write, copied into the points it touches.
    version: u64,
}

/// Map-backed vector store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(collection: &str) -> IndexError {
    IndexError::CollectionNotFound(collection.to_string())
}

impl PointStore for MemoryStore {
    fn create_collection<'a>(
        &'a self,
        collection: &'a str,
        space: VectorSpace,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            let mut guard = self.collections.write().await;
            if guard.contains_key(collection) {
                return Err(IndexError::AlreadyExists(collection.to_string()));
            }
            guard.insert(
                collection.to_string(),
                MemCollection {
                    space,
                    points: BTreeMap::new(),
                    version: 0,
                },
            );
            debug!(collection, size = space.size, "memory: collection created");
            Ok(())
        })
    }

    fn delete_collection<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            self.collections
                .write()
                .await
                .remove(collection)
                .map(|_| ())
                .ok_or_else(|| missing(collection))
        })
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64, IndexError>> {
        Box::pin(async move {
            let guard = self.collections.read().await;
            let c = guard.get(collection).ok_or_else(|| missing(collection))?;
            Ok(c.points.len() as u64)
        })
    }

    fn upsert<'a>(
        &'a self,
        collection: &'a str,
        points: Vec<IndexPoint>,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            let mut guard = self.collections.write().await;
            let c = guard.get_mut(collection).ok_or_else(|| missing(collection))?;

            // Validate the whole batch first so a bad vector leaves nothing half-written.
            if let Some(bad) = points.iter().find(|p| p.vector.len() != c.space.size) {
                return Err(IndexError::VectorSizeMismatch {
                    got: bad.vector.len(),
                    want: c.space.size,
                });
            }

            c.version += 1;
            let version = c.version;
            for p in points {
                c.points.insert(
                    p.id,
                    MemPoint {
                        vector: p.vector,
                        payload: p.payload,
                        version,
                    },
                );
            }
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<Option<StoredPoint>, IndexError>> {
        Box::pin(async move {
            let guard = self.collections.read().await;
            let c = guard.get(collection).ok_or_else(|| missing(collection))?;
            Ok(c.points.get(&id).map(|p| StoredPoint {
                id,
                payload: p.payload.clone(),
            }))
        })
    }

    fn delete_point<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            let mut guard = self.collections.write().await;
            let c = guard.get_mut(collection).ok_or_else(|| missing(collection))?;
            if c.points.remove(&id).is_some() {
                c.version += 1;
            }
            Ok(())
        })
    }

    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredHit>, IndexError>> {
        Box::pin(async move {
            let guard = self.collections.read().await;
            let c = guard.get(collection).ok_or_else(|| missing(collection))?;

            if vector.len() != c.space.size {
                return Err(IndexError::VectorSizeMismatch {
                    got: vector.len(),
                    want: c.space.size,
                });
            }

            let distance = c.space.distance;
            let mut scored: Vec<(u64, f32, &MemPoint)> = c
                .points
                .iter()
                .map(|(id, p)| (*id, score(distance, &vector, &p.vector), p))
                .collect();

            match distance {
                DistanceKind::Euclid => scored.sort_by(|a, b| a.1.total_cmp(&b.1)),
                DistanceKind::Cosine | DistanceKind::Dot => {
                    scored.sort_by(|a, b| b.1.total_cmp(&a.1))
                }
            }

            Ok(scored
                .into_iter()
                .take(top_k as usize)
                .map(|(id, score, p)| ScoredHit {
                    id: Some(HitId::Num(id)),
                    version: p.version,
                    score,
                    payload: Value::Object(p.payload.clone()),
                })
                .collect())
        })
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn score(distance: DistanceKind, a: &[f32], b: &[f32]) -> f32 {
    match distance {
        DistanceKind::Dot => dot(a, b),
        DistanceKind::Cosine => {
            let norm = dot(a, a).sqrt() * dot(b, b).sqrt();
            if norm == 0.0 { 0.0 } else { dot(a, b) / norm }
        }
        DistanceKind::Euclid => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}
