//! Vector search facade: collections, batch indexing, point CRUD and query search.
//!
//! This crate provides:
//! - [`SearchClient`], the single entry point used by the HTTP layer
//! - [`PointStore`] and [`EmbeddingsProvider`] seams, with a Qdrant adapter,
//!   an in-memory store and an Ollama embedder
//! - [`Table`] for CSV uploads and [`IndexReport`] for per-batch outcomes
//!
//! Handles are injected explicitly; nothing here is process-global.

mod config;
mod embed;
mod errors;
mod id_alloc;
mod ingest;
mod memory_store;
mod qdrant_facade;
mod record;
mod store;
mod table;

pub use config::{DEFAULT_BATCH_SIZE, DistanceKind, IndexConfig, VectorSpace};
pub use embed::EmbeddingsProvider;
pub use embed::ollama::OllamaEmbedder;
pub use errors::IndexError;
pub use ingest::{BatchOutcome, BatchStatus, IndexReport};
pub use memory_store::MemoryStore;
pub use qdrant_facade::QdrantFacade;
pub use record::{HitId, IndexPoint, ScoredHit, StoredPoint};
pub use store::PointStore;
pub use table::{TEXT_COLUMN, Table};

use std::sync::Arc;

use id_alloc::IdAllocator;
use tracing::{debug, info, trace};

/// High-level facade over a vector store and an embedding model.
///
/// Cheap to share behind an `Arc`; the only internal state is the id allocator.
pub struct SearchClient {
    store: Arc<dyn PointStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    batch_size: usize,
    ids: IdAllocator,
}

impl SearchClient {
    /// Wires a store and an embedder. A `batch_size` of zero falls back to [`DEFAULT_BATCH_SIZE`].
    pub fn new(
        store: Arc<dyn PointStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        batch_size: usize,
    ) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self {
            store,
            embedder,
            batch_size,
            ids: IdAllocator::new(),
        }
    }

    /// Dimensionality used for new collections.
    pub fn vector_size(&self) -> usize {
        self.embedder.dim()
    }

    /// Creates `name` with the embedder's dimensionality.
    ///
    /// # Errors
    /// `InvalidDistance` for an unknown metric, `AlreadyExists` if the name is taken.
    pub async fn create_collection(&self, name: &str, distance: &str) -> Result<(), IndexError> {
        let distance: DistanceKind = distance.parse()?;
        let space = VectorSpace {
            size: self.vector_size(),
            distance,
        };
        self.store.create_collection(name, space).await?;
        self.ids.reset(name).await;
        info!(collection = name, %distance, size = space.size, "Collection created");
        Ok(())
    }

    /// Embeds and upserts every row of `table`, recording each batch's outcome.
    ///
    /// # Errors
    /// `MissingTextColumn` before any write; `CollectionNotFound` aborts the run.
    pub async fn index_table(&self, name: &str, table: &Table) -> Result<IndexReport, IndexError> {
        let report = ingest::index_table(
            self.store.as_ref(),
            self.embedder.as_ref(),
            name,
            table,
            self.batch_size,
        )
        .await?;
        // Rows took ids 0..rows; later adds start above them.
        self.ids.advance_past(name, report.rows as u64).await;
        Ok(report)
    }

    /// Embeds `query` and returns the `top_k` nearest points, best first.
    pub async fn search(&self, name: &str, query: &str, top_k: u64) -> Result<Vec<ScoredHit>, IndexError> {
        trace!(collection = name, top_k, "SearchClient::search");
        let vector = self.embedder.embed(query).await?;
        let hits = self.store.search(name, vector, top_k).await?;
        debug!(collection = name, hits = hits.len(), "Search done");
        Ok(hits)
    }

    /// Adds a `{title, text}` point under a freshly allocated id and returns the id.
    pub async fn add_point(&self, name: &str, title: &str, content: &str) -> Result<u64, IndexError> {
        let id = self.ids.allocate(self.store.as_ref(), name).await?;
        let vector = self.embedder.embed(content).await?;
        self.store
            .upsert(name, vec![IndexPoint::titled(id, vector, title, content)])
            .await?;
        info!(collection = name, id, "Point added");
        Ok(id)
    }

    /// Replaces title and text of an existing point, keeping its id.
    ///
    /// # Errors
    /// `PointNotFound` when no point has this id.
    pub async fn edit_point(
        &self,
        name: &str,
        id: u64,
        title: &str,
        content: &str,
    ) -> Result<(), IndexError> {
        if self.store.get(name, id).await?.is_none() {
            return Err(IndexError::PointNotFound {
                collection: name.to_string(),
                id,
            });
        }
        let vector = self.embedder.embed(content).await?;
        self.store
            .upsert(name, vec![IndexPoint::titled(id, vector, title, content)])
            .await?;
        info!(collection = name, id, "Point updated");
        Ok(())
    }

    pub async fn delete_point(&self, name: &str, id: u64) -> Result<(), IndexError> {
        self.store.delete_point(name, id).await?;
        info!(collection = name, id, "Point deleted");
        Ok(())
    }

    pub async fn delete_collection(&self, name: &str) -> Result<(), IndexError> {
        self.store.delete_collection(name).await?;
        self.ids.reset(name).await;
        info!(collection = name, "Collection deleted");
        Ok(())
    }
}
