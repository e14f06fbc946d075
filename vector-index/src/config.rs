//! Runtime and collection configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IndexError;

/// Rows per embed+upsert round during batch indexing.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    /// Cosine similarity (recommended for sentence embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = IndexError;

    /// Case-insensitive; accepts `euclidean` as an alias of `euclid`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(DistanceKind::Cosine),
            "dot" => Ok(DistanceKind::Dot),
            "euclid" | "euclidean" => Ok(DistanceKind::Euclid),
            _ => Err(IndexError::InvalidDistance(s.to_string())),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DistanceKind::Cosine => "cosine",
            DistanceKind::Dot => "dot",
            DistanceKind::Euclid => "euclid",
        };
        f.write_str(s)
    }
}

/// Describes the vector space of a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Connection and batching configuration.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Rows per batch when indexing tables.
    pub batch_size: usize,
}

impl IndexConfig {
    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.batch_size == 0 {
            return Err(IndexError::Config("batch_size must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_parsing_is_case_insensitive() {
        assert_eq!("Cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!("DOT".parse::<DistanceKind>().unwrap(), DistanceKind::Dot);
        assert_eq!("euclid".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert_eq!("euclidean".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
    }

    #[test]
    fn unknown_distance_is_rejected() {
        let err = "manhattan".parse::<DistanceKind>().unwrap_err();
        assert!(matches!(err, IndexError::InvalidDistance(ref d) if d == "manhattan"));
    }

    #[test]
    fn zero_batch_is_invalid() {
        let mut cfg = IndexConfig {
            qdrant_url: "http://localhost:6334".into(),
            qdrant_api_key: None,
            batch_size: DEFAULT_BATCH_SIZE,
        };
        assert!(cfg.validate().is_ok());
        cfg.batch_size = 0;
        assert!(matches!(cfg.validate(), Err(IndexError::Config(_))));
    }
}
