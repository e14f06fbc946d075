//! Ollama embedding provider.
//!
//! Adapts [`embed_service::OllamaService`] to [`EmbeddingsProvider`].

use std::sync::Arc;

use embed_service::OllamaService;
use futures::future::BoxFuture;

use crate::{EmbeddingsProvider, IndexError};

/// Ollama embedding provider (async, batch-capable).
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
}

impl OllamaEmbedder {
    /// Wraps a shared Ollama client.
    pub fn new(svc: Arc<OllamaService>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn dim(&self) -> usize {
        self.svc.config().dim
    }

    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, IndexError>> {
        Box::pin(async move { Ok(self.svc.embed(text).await?) })
    }

    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, IndexError>> {
        Box::pin(async move { Ok(self.svc.embed_batch(texts).await?) })
    }
}
