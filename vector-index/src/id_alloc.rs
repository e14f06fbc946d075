//! Per-collection point id allocation.
//!
//! The next id for a collection starts at its point count and is then
//! advanced past any id that is already occupied, so deletes that leave
//! holes never cause an existing point to be overwritten. Each collection
//! has its own async mutex: ids are unique among concurrent adders of this
//! process, and probing one collection never stalls another.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::IndexError;
use crate::store::PointStore;

/// Cached next id of one collection; `None` until seeded from the store.
type Slot = Arc<Mutex<Option<u64>>>;

#[derive(Default)]
pub struct IdAllocator {
    slots: Mutex<HashMap<String, Slot>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, collection: &str) -> Slot {
        let mut slots = self.slots.lock().await;
        slots.entry(collection.to_string()).or_default().clone()
    }

    /// Returns a fresh id for `collection` and reserves it.
    pub async fn allocate(&self, store: &dyn PointStore, collection: &str) -> Result<u64, IndexError> {
        let slot = self.slot(collection).await;
        let mut next = slot.lock().await;

        let mut candidate = match *next {
            Some(id) => id,
            None => store.count(collection).await?,
        };
        while store.get(collection, candidate).await?.is_some() {
            candidate += 1;
        }

        *next = Some(candidate + 1);
        debug!(collection, id = candidate, "Allocated point id");
        Ok(candidate)
    }

    /// Moves a seeded position to at least `end`, after ids `0..end` were written in bulk.
    ///
    /// An unseeded collection is left alone; its first allocation seeds from the count.
    pub async fn advance_past(&self, collection: &str, end: u64) {
        let slot = self.slot(collection).await;
        let mut next = slot.lock().await;
        if let Some(id) = next.as_mut() {
            *id = (*id).max(end);
        }
    }

    /// Forgets the cached position of `collection` (after create/delete).
    pub async fn reset(&self, collection: &str) {
        let slot = self.slot(collection).await;
        *slot.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::BoxFuture;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::config::{DistanceKind, VectorSpace};
    use crate::memory_store::MemoryStore;
    use crate::record::{IndexPoint, ScoredHit, StoredPoint};

    const SPACE: VectorSpace = VectorSpace {
        size: 1,
        distance: DistanceKind::Dot,
    };

    /// Memory store whose `get` on the `slow` collection waits for a permit.
    struct GatedStore {
        inner: MemoryStore,
        gate: Semaphore,
    }

    impl GatedStore {
        async fn new() -> Self {
            let inner = MemoryStore::new();
            inner.create_collection("slow", SPACE).await.unwrap();
            inner.create_collection("fast", SPACE).await.unwrap();
            Self {
                inner,
                gate: Semaphore::new(0),
            }
        }
    }

    impl PointStore for GatedStore {
        fn create_collection<'a>(
            &'a self,
            collection: &'a str,
            space: VectorSpace,
        ) -> BoxFuture<'a, Result<(), IndexError>> {
            self.inner.create_collection(collection, space)
        }

        fn delete_collection<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<(), IndexError>> {
            self.inner.delete_collection(collection)
        }

        fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64, IndexError>> {
            self.inner.count(collection)
        }

        fn upsert<'a>(
            &'a self,
            collection: &'a str,
            points: Vec<IndexPoint>,
        ) -> BoxFuture<'a, Result<(), IndexError>> {
            self.inner.upsert(collection, points)
        }

        fn get<'a>(
            &'a self,
            collection: &'a str,
            id: u64,
        ) -> BoxFuture<'a, Result<Option<StoredPoint>, IndexError>> {
            Box::pin(async move {
                if collection == "slow" {
                    let _permit = self.gate.acquire().await;
                }
                self.inner.get(collection, id).await
            })
        }

        fn delete_point<'a>(
            &'a self,
            collection: &'a str,
            id: u64,
        ) -> BoxFuture<'a, Result<(), IndexError>> {
            self.inner.delete_point(collection, id)
        }

        fn search<'a>(
            &'a self,
            collection: &'a str,
            vector: Vec<f32>,
            top_k: u64,
        ) -> BoxFuture<'a, Result<Vec<ScoredHit>, IndexError>> {
            self.inner.search(collection, vector, top_k)
        }
    }

    async fn store_with(ids: &[u64]) -> MemoryStore {
        let store = MemoryStore::new();
        store.create_collection("c", SPACE).await.unwrap();
        let points = ids
            .iter()
            .map(|id| IndexPoint::titled(*id, vec![1.0], "t", "x"))
            .collect();
        store.upsert("c", points).await.unwrap();
        store
    }

    #[tokio::test]
    async fn skips_ids_left_by_deletes() {
        // count = 2 but id 2 is taken, so the first free slot at or above 2 is 3.
        let store = store_with(&[0, 2]).await;
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 3);
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn reset_reseeds_from_store() {
        let store = store_with(&[0]).await;
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 1);
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 2);
        ids.reset("c").await;
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn advance_past_skips_bulk_written_ids() {
        let store = store_with(&[0]).await;
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 1);

        let bulk = (0..50).map(|id| IndexPoint::titled(id, vec![1.0], "t", "x")).collect();
        store.upsert("c", bulk).await.unwrap();
        ids.advance_past("c", 50).await;

        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 50);
    }

    #[tokio::test]
    async fn advance_past_never_moves_backwards() {
        let store = store_with(&[]).await;
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 0);
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 1);
        ids.advance_past("c", 1).await;
        assert_eq!(ids.allocate(&store, "c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn slow_collection_does_not_block_others() {
        let store = Arc::new(GatedStore::new().await);
        let ids = Arc::new(IdAllocator::new());

        let blocked = tokio::spawn({
            let (ids, store) = (ids.clone(), store.clone());
            async move { ids.allocate(store.as_ref(), "slow").await }
        });
        tokio::task::yield_now().await;

        let fast = tokio::time::timeout(Duration::from_secs(2), ids.allocate(store.as_ref(), "fast"))
            .await
            .expect("allocation on another collection must not wait")
            .unwrap();
        assert_eq!(fast, 0);

        store.gate.add_permits(1);
        assert_eq!(blocked.await.unwrap().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_collection_propagates() {
        let store = MemoryStore::new();
        let ids = IdAllocator::new();
        assert!(matches!(
            ids.allocate(&store, "nope").await,
            Err(IndexError::CollectionNotFound(_))
        ));
    }
}
