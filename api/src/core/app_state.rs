use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use vector_index::{DEFAULT_BATCH_SIZE, IndexConfig, SearchClient};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: AppConfig,
    /// Vector search facade, built once in `main`.
    pub search: Arc<SearchClient>,
}

impl AppState {
    pub fn new(config: AppConfig, search: Arc<SearchClient>) -> Self {
        Self { config, search }
    }
}

/// Which [`vector_index::PointStore`] backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorBackend {
    Qdrant,
    Memory,
}

impl FromStr for VectorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qdrant" => Ok(VectorBackend::Qdrant),
            "memory" => Ok(VectorBackend::Memory),
            other => Err(ConfigError::Invalid {
                var: "VECTOR_BACKEND",
                reason: format!("`{other}` is not one of [qdrant, memory]"),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration resolved from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Listen address, e.g. `0.0.0.0:7861`.
    pub api_address: String,
    pub vector_backend: VectorBackend,
    /// Qdrant gRPC endpoint.
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    /// Rows per embed+upsert round in `indexing_data`.
    pub batch_size: usize,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolution logic over an arbitrary variable lookup.
    ///
    /// - `API_ADDRESS` defaults to `0.0.0.0:7861`
    /// - `QDRANT_URL` wins over `QDRANT_HOST` + `QDRANT_PORT` (`localhost:6334`)
    /// - empty values count as unset
    pub fn resolve<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_address = var("API_ADDRESS").unwrap_or_else(|| "0.0.0.0:7861".into());

        let vector_backend = match var("VECTOR_BACKEND") {
            Some(v) => v.parse()?,
            None => VectorBackend::Qdrant,
        };

        let qdrant_url = var("QDRANT_URL").unwrap_or_else(|| {
            let host = var("QDRANT_HOST").unwrap_or_else(|| "localhost".into());
            let port = var("QDRANT_PORT").unwrap_or_else(|| "6334".into());
            format!("http://{host}:{port}")
        });

        let batch_size = match var("INDEX_BATCH_SIZE") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "INDEX_BATCH_SIZE",
                        reason: "must be > 0".into(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "INDEX_BATCH_SIZE",
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(Self {
            api_address,
            vector_backend,
            qdrant_url,
            qdrant_api_key: var("QDRANT_API_KEY"),
            batch_size,
        })
    }

    /// Connection settings for [`vector_index::QdrantFacade`].
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            qdrant_url: self.qdrant_url.clone(),
            qdrant_api_key: self.qdrant_api_key.clone(),
            batch_size: self.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::resolve(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let cfg = resolve(&[]).unwrap();
        assert_eq!(cfg.api_address, "0.0.0.0:7861");
        assert_eq!(cfg.vector_backend, VectorBackend::Qdrant);
        assert_eq!(cfg.qdrant_url, "http://localhost:6334");
        assert_eq!(cfg.qdrant_api_key, None);
        assert_eq!(cfg.batch_size, 128);
    }

    #[test]
    fn qdrant_url_wins_over_host_and_port() {
        let cfg = resolve(&[
            ("QDRANT_URL", "http://qdrant:6334"),
            ("QDRANT_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(cfg.qdrant_url, "http://qdrant:6334");

        let cfg = resolve(&[("QDRANT_HOST", "db"), ("QDRANT_PORT", "7000")]).unwrap();
        assert_eq!(cfg.qdrant_url, "http://db:7000");
    }

    #[test]
    fn backend_and_batch_are_validated() {
        let cfg = resolve(&[("VECTOR_BACKEND", "Memory"), ("INDEX_BATCH_SIZE", "32")]).unwrap();
        assert_eq!(cfg.vector_backend, VectorBackend::Memory);
        assert_eq!(cfg.index_config().batch_size, 32);

        assert!(resolve(&[("VECTOR_BACKEND", "redis")]).is_err());
        assert!(resolve(&[("INDEX_BATCH_SIZE", "0")]).is_err());
        assert!(resolve(&[("INDEX_BATCH_SIZE", "many")]).is_err());
    }
}
