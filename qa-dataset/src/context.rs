//! External context files for datasets that ship without passages.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{DatasetError, Result};
use crate::record::QaRecord;

/// `{record id: context}` map loaded from a JSON object file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextLookup {
    by_id: HashMap<String, String>,
}

impl ContextLookup {
    pub fn from_map(by_id: HashMap<String, String>) -> Self {
        Self { by_id }
    }

    /// Reads a JSON object mapping ids to context strings.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading contexts from {:?}", path);

        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let by_id: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
                path: path.to_path_buf(),
                line: 0,
                source,
            })?;

        debug!(contexts = by_id.len(), "Contexts loaded");
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Fills `context` of every record from `lookup`.
///
/// # Errors
/// [`DatasetError::MissingContext`] for the first id without an entry; nothing is returned then.
pub fn join_context(records: Vec<QaRecord>, lookup: &ContextLookup) -> Result<Vec<QaRecord>> {
    records
        .into_iter()
        .map(|mut r| {
            let ctx = lookup
                .get(&r.id)
                .ok_or_else(|| DatasetError::MissingContext { id: r.id.clone() })?;
            r.context = Some(ctx.to_string());
            Ok(r)
        })
        .collect()
}
