//! Batch indexing of uploaded tables.
//!
//! Pipeline per chunk of `batch_size` rows: embed the `text` column in one
//! call, assign ids `offset..offset + len` (absolute row index), upsert with
//! the whole row as payload. A failed chunk is recorded in the report and
//! the loop moves on, except when the collection itself is gone.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;
use crate::record::IndexPoint;
use crate::store::PointStore;
use crate::table::Table;

/// Outcome of one chunk.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    Ok,
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Zero-based chunk number.
    pub batch: usize,
    pub first_id: u64,
    pub last_id: u64,
    #[serde(flatten)]
    pub status: BatchStatus,
}

/// Aggregate result of one indexing run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexReport {
    pub collection: String,
    pub rows: usize,
    pub batches: Vec<BatchOutcome>,
    pub failed_batches: usize,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.failed_batches == 0
    }
}

/// Embeds and upserts `table` into `collection` in chunks of `batch_size`.
pub async fn index_table(
    store: &dyn PointStore,
    embedder: &dyn EmbeddingsProvider,
    collection: &str,
    table: &Table,
    batch_size: usize,
) -> Result<IndexReport, IndexError> {
    table.require_text_column()?;

    let batch_size = batch_size.max(1);
    let total_chunks = table.len().div_ceil(batch_size);
    info!(collection, rows = table.len(), batch_size, "Indexing table");

    let pb = ProgressBar::new(total_chunks as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }

    let mut batches = Vec::with_capacity(total_chunks);
    let mut failed_batches = 0;

    for (batch, chunk) in table.rows().chunks(batch_size).enumerate() {
        let offset = (batch * batch_size) as u64;
        let first_id = offset;
        let last_id = offset + chunk.len() as u64 - 1;

        let status = match index_chunk(store, embedder, collection, chunk, offset).await {
            Ok(()) => BatchStatus::Ok,
            Err(err @ IndexError::CollectionNotFound(_)) => {
                pb.abandon();
                return Err(err);
            }
            Err(err) => {
                error!(collection, batch, first_id, last_id, error = %err, "Batch failed");
                failed_batches += 1;
                BatchStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };

        batches.push(BatchOutcome {
            batch,
            first_id,
            last_id,
            status,
        });
        pb.inc(1);
    }

    if failed_batches == 0 {
        pb.finish_with_message("Indexing complete ✔");
        info!(collection, rows = table.len(), "Indexed table");
    } else {
        pb.abandon();
        warn!(collection, failed_batches, total_chunks, "Indexing finished with failed batches");
    }

    Ok(IndexReport {
        collection: collection.to_string(),
        rows: table.len(),
        batches,
        failed_batches,
    })
}

async fn index_chunk(
    store: &dyn PointStore,
    embedder: &dyn EmbeddingsProvider,
    collection: &str,
    chunk: &[serde_json::Map<String, serde_json::Value>],
    offset: u64,
) -> Result<(), IndexError> {
    let texts = Table::texts(chunk);
    let vectors = embedder.embed_batch(&texts).await?;
    if vectors.len() != chunk.len() {
        return Err(IndexError::Embedding(format!(
            "expected {} vectors, got {}",
            chunk.len(),
            vectors.len()
        )));
    }

    let points = chunk
        .iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (row, vector))| IndexPoint {
            id: offset + i as u64,
            vector,
            payload: row.clone(),
        })
        .collect();

    store.upsert(collection, points).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn report_serializes_flat_status() {
        let report = IndexReport {
            collection: "docs".into(),
            rows: 3,
            batches: vec![
                BatchOutcome {
                    batch: 0,
                    first_id: 0,
                    last_id: 1,
                    status: BatchStatus::Ok,
                },
                BatchOutcome {
                    batch: 1,
                    first_id: 2,
                    last_id: 2,
                    status: BatchStatus::Failed {
                        reason: "boom".into(),
                    },
                },
            ],
            failed_batches: 1,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "collection": "docs",
                "rows": 3,
                "batches": [
                    {"batch": 0, "first_id": 0, "last_id": 1, "status": "ok"},
                    {"batch": 1, "first_id": 2, "last_id": 2, "status": "failed", "reason": "boom"}
                ],
                "failed_batches": 1
            })
        );
        assert!(!report.is_complete());
    }
}
