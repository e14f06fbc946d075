//! Lightweight Ollama client for embeddings.
//!
//! Implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/embed` — embeddings for one or many inputs
//! - `GET  {endpoint}/api/tags`  — reachability probe
//!
//! # Examples
//!
//! ```no_run
//! use embed_service::{EmbeddingModelConfig, OllamaService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbeddingModelConfig {
//!     model: "all-minilm".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     dim: 384,
//!     timeout_secs: Some(30),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let vec = svc.embed("Ferris is a friendly crab.").await?;
//! assert_eq!(vec.len(), 384);
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::embedding_model_config::EmbeddingModelConfig;
use crate::error_handler::{EmbedError, Result, make_snippet, validate_http_endpoint};

/// Thin client for Ollama embeddings.
///
/// Reuses one HTTP client (with the configured timeout) across calls, so
/// build it once and share it behind an `Arc`.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url_embed: String,
    url_tags: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`EmbedError::Config`] if `cfg.endpoint` is invalid
    /// - [`EmbedError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        validate_http_endpoint("OLLAMA_URL", endpoint)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .brotli(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_embed = format!("{base}/api/embed");
        let url_tags = format!("{base}/api/tags");

        Ok(Self {
            client,
            cfg,
            url_embed,
            url_tags,
        })
    }

    /// Returns the model configuration this client was built with.
    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }

    /// Embeds a single text.
    ///
    /// # Errors
    /// Same as [`OllamaService::embed_batch`].
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let mut out = self.embed_batch(&[input.to_string()]).await?;
        out.pop()
            .ok_or_else(|| EmbedError::Decode("empty `embeddings` array".into()))
    }

    /// Embeds many texts in one request, preserving input order.
    ///
    /// # Errors
    /// - [`EmbedError::HttpStatus`] for non-2xx responses
    /// - [`EmbedError::Transport`] for client errors
    /// - [`EmbedError::Decode`] if the response cannot be parsed or has the wrong length
    /// - [`EmbedError::Dimension`] if a vector does not match `cfg.dim`
    #[instrument(skip_all, fields(model = %self.cfg.model, inputs = inputs.len()))]
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbedRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!("POST {}", self.url_embed);
        let resp = self.client.post(&self.url_embed).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embed.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbedError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            EmbedError::Decode(format!(
                "serde error: {e}; expected `{{ embeddings: number[][] }}`"
            ))
        })?;

        if out.embeddings.len() != inputs.len() {
            return Err(EmbedError::Decode(format!(
                "got {} embeddings for {} inputs",
                out.embeddings.len(),
                inputs.len()
            )));
        }
        if let Some(bad) = out.embeddings.iter().find(|v| v.len() != self.cfg.dim) {
            return Err(EmbedError::Dimension {
                got: bad.len(),
                want: self.cfg.dim,
            });
        }

        Ok(out.embeddings)
    }

    /// Probes `/api/tags` and reports whether the configured model is pulled.
    ///
    /// # Errors
    /// Transport, status and decode errors as for [`OllamaService::embed_batch`].
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn has_model(&self) -> Result<bool> {
        debug!("GET {}", self.url_tags);
        let resp = self.client.get(&self.url_tags).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbedError::HttpStatus {
                status,
                url: self.url_tags.clone(),
                snippet: make_snippet(&text),
            });
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| EmbedError::Decode(format!("serde error: {e}; expected `{{ models: [] }}`")))?;

        // Ollama reports `all-minilm:latest` for a bare `all-minilm` pull.
        let wanted = self.cfg.model.as_str();
        Ok(tags
            .models
            .iter()
            .any(|m| m.name == wanted || m.name.split(':').next() == Some(wanted)))
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response body for `/api/embed`.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Response body for `/api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}
