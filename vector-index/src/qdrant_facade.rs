//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind [`PointStore`],
//! hiding the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`. Qdrant reports conflicts
//! only as error text, so [`classify`] maps those messages onto the typed
//! [`IndexError`] variants the HTTP layer understands.

use std::collections::HashMap;

use futures::future::BoxFuture;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance,
    GetPointsBuilder, PointId, PointStruct, PointsIdsList, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{DistanceKind, IndexConfig, VectorSpace};
use crate::errors::IndexError;
use crate::record::{HitId, IndexPoint, ScoredHit, StoredPoint};
use crate::store::PointStore;

/// A facade over the Qdrant client.
pub struct QdrantFacade {
    client: Qdrant,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication. No network call is made here.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PointStore for QdrantFacade {
    fn create_collection<'a>(
        &'a self,
        collection: &'a str,
        space: VectorSpace,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            info!(
                collection,
                size = space.size,
                distance = %space.distance,
                "qdrant: create collection"
            );

            let distance = match space.distance {
                DistanceKind::Cosine => Distance::Cosine,
                DistanceKind::Dot => Distance::Dot,
                DistanceKind::Euclid => Distance::Euclid,
            };

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(collection)
                        .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
                )
                .await
                .map_err(|e| classify(collection, e))?;

            Ok(())
        })
    }

    fn delete_collection<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            info!(collection, "qdrant: delete collection");

            let res = self
                .client
                .delete_collection(collection)
                .await
                .map_err(|e| classify(collection, e))?;

            // Recent servers answer `result: false` instead of an error.
            if !res.result {
                return Err(IndexError::CollectionNotFound(collection.to_string()));
            }
            Ok(())
        })
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64, IndexError>> {
        Box::pin(async move {
            let res = self
                .client
                .count(CountPointsBuilder::new(collection).exact(true))
                .await
                .map_err(|e| classify(collection, e))?;

            let count = res.result.map(|r| r.count).unwrap_or(0);
            debug!(collection, count, "qdrant: count");
            Ok(count)
        })
    }

    fn upsert<'a>(
        &'a self,
        collection: &'a str,
        points: Vec<IndexPoint>,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            if points.is_empty() {
                debug!("No points provided for upsert");
                return Ok(());
            }

            info!(collection, points = points.len(), "qdrant: upsert");

            let mut structs = Vec::with_capacity(points.len());
            for p in points {
                let payload = Payload::try_from(Value::Object(p.payload))
                    .map_err(|e| IndexError::Qdrant(format!("payload convert: {e}")))?;
                structs.push(PointStruct::new(p.id, p.vector, payload));
            }

            let res = self
                .client
                .upsert_points(UpsertPointsBuilder::new(collection, structs).wait(true))
                .await
                .map_err(|e| classify(collection, e))?;

            debug!("Upsert operation result={:?}", res.result);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<Option<StoredPoint>, IndexError>> {
        Box::pin(async move {
            let res = self
                .client
                .get_points(
                    GetPointsBuilder::new(collection, vec![PointId::from(id)]).with_payload(true),
                )
                .await
                .map_err(|e| classify(collection, e))?;

            Ok(res.result.into_iter().next().map(|p| StoredPoint {
                id,
                payload: qpayload_to_map(p.payload),
            }))
        })
    }

    fn delete_point<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<(), IndexError>> {
        Box::pin(async move {
            info!(collection, id, "qdrant: delete point");

            self.client
                .delete_points(
                    DeletePointsBuilder::new(collection)
                        .points(PointsIdsList {
                            ids: vec![PointId::from(id)],
                        })
                        .wait(true),
                )
                .await
                .map_err(|e| classify(collection, e))?;

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
            info!(collection, top_k, "qdrant: search");

            let res = self
                .client
                .search_points(
                    SearchPointsBuilder::new(collection, vector, top_k).with_payload(true),
                )
                .await
                .map_err(|e| classify(collection, e))?;

            let hits: Vec<ScoredHit> = res
                .result
                .into_iter()
                .map(|r| ScoredHit {
                    id: r.id.and_then(hit_id),
                    version: r.version,
                    score: r.score,
                    payload: Value::Object(qpayload_to_map(r.payload)),
                })
                .collect();

            debug!("Search completed: {} hits returned", hits.len());
            Ok(hits)
        })
    }
}

/// Maps a Qdrant error onto the typed conflict variants by message text.
///
/// Qdrant phrases these as ``Collection `x` already exists!`` and
/// ``Not found: Collection `x` doesn't exist!``.
fn classify(collection: &str, err: QdrantError) -> IndexError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if lower.contains("already exists") {
        IndexError::AlreadyExists(collection.to_string())
    } else if lower.contains("doesn't exist")
        || lower.contains("does not exist")
        || lower.contains("not exists")
        || lower.contains("not found")
    {
        IndexError::CollectionNotFound(collection.to_string())
    } else {
        IndexError::Qdrant(msg)
    }
}

fn hit_id(id: PointId) -> Option<HitId> {
    match id.point_id_options? {
        PointIdOptions::Num(n) => Some(HitId::Num(n)),
        PointIdOptions::Uuid(u) => Some(HitId::Uuid(u)),
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into a JSON object.
fn qpayload_to_map(p: HashMap<String, QValue>) -> Map<String, Value> {
    p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect()
}

fn qvalue_to_json(v: QValue) -> Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => Value::String(s),
        Some(K::IntegerValue(i)) => Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => Value::Bool(b),
        Some(K::ListValue(list)) => Value::Array(list.values.into_iter().map(qvalue_to_json).collect()),
        Some(K::StructValue(s)) => Value::Object(qpayload_to_map(s.fields)),
        Some(K::NullValue(_)) | None => Value::Null,
    }
}
