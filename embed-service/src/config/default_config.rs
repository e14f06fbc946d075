//! Default embedding config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `EMBEDDING_MODEL`             = embedding model (default `all-minilm`)
//! - `EMBEDDING_DIM`               = vector size (default `384`)
//! - `EMBEDDING_TIMEOUT_SECS`      = request timeout (default `30`)

use crate::{
    config::embedding_model_config::EmbeddingModelConfig,
    error_handler::{ConfigError, EmbedError, env_opt, validate_http_endpoint},
};

/// Sentence-embedding model with 384-dimensional output.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
/// Output size of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Constructs the embedding config from the process environment.
///
/// # Errors
/// - [`ConfigError::InvalidNumber`] for a malformed port, dimension or timeout
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` has no http(s) scheme
pub fn config_ollama_embedding() -> Result<EmbeddingModelConfig, EmbedError> {
    resolve_embedding_config(env_opt)
}

/// Builds the config from an arbitrary key lookup.
///
/// Split out from [`config_ollama_embedding`] so resolution rules can be
/// exercised without touching the process environment.
pub fn resolve_embedding_config<F>(lookup: F) -> Result<EmbeddingModelConfig, EmbedError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = ollama_endpoint(&lookup)?;
    validate_http_endpoint("OLLAMA_URL", &endpoint)?;

    let model = lookup("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let dim = match lookup("EMBEDDING_DIM") {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or(ConfigError::InvalidNumber {
                var: "EMBEDDING_DIM",
                reason: "expected a positive integer",
            })?,
        None => DEFAULT_EMBEDDING_DIM,
    };

    let timeout_secs = match lookup("EMBEDDING_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "EMBEDDING_TIMEOUT_SECS",
                reason: "expected u64",
            })?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(EmbeddingModelConfig {
        model,
        endpoint,
        dim,
        timeout_secs: Some(timeout_secs),
    })
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
fn ollama_endpoint<F>(lookup: &F) -> Result<String, EmbedError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("OLLAMA_URL") {
        return Ok(url.trim().to_string());
    }
    if let Some(port) = lookup("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}
