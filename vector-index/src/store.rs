//! Storage seam: the operations the facade needs from a vector database.

use futures::future::BoxFuture;

use crate::config::VectorSpace;
use crate::errors::IndexError;
use crate::record::{IndexPoint, ScoredHit, StoredPoint};

/// Vector database operations used by [`crate::SearchClient`].
///
/// Contract shared by every backend:
/// - `create_collection` on an existing name fails with [`IndexError::AlreadyExists`];
/// - every other call on a missing collection fails with [`IndexError::CollectionNotFound`];
/// - `upsert` replaces points with the same id;
/// - `delete_point` of an absent id is a no-op.
pub trait PointStore: Send + Sync {
    fn create_collection<'a>(
        &'a self,
        collection: &'a str,
        space: VectorSpace,
    ) -> BoxFuture<'a, Result<(), IndexError>>;

    fn delete_collection<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<(), IndexError>>;

    /// Exact number of points in the collection.
    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64, IndexError>>;

    fn upsert<'a>(
        &'a self,
        collection: &'a str,
        points: Vec<IndexPoint>,
    ) -> BoxFuture<'a, Result<(), IndexError>>;

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<Option<StoredPoint>, IndexError>>;

    fn delete_point<'a>(
        &'a self,
        collection: &'a str,
        id: u64,
    ) -> BoxFuture<'a, Result<(), IndexError>>;

    /// Top-`top_k` nearest points by the collection's distance, best first.
    fn search<'a>(
        &'a self,
        collection: &'a str,
        vector: Vec<f32>,
        top_k: u64,
    ) -> BoxFuture<'a, Result<Vec<ScoredHit>, IndexError>>;
}
