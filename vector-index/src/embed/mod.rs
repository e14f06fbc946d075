use futures::future::BoxFuture;

use crate::errors::IndexError;

/// Provider interface for embedding generation.
///
/// Async is required because real providers (Ollama, hosted APIs) perform
/// HTTP requests. Implement this trait to plug in another backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Dimensionality of the vectors this provider returns.
    fn dim(&self) -> usize;

    /// Embeds one text.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, IndexError>>;

    /// Embeds many texts, preserving order.
    ///
    /// The default implementation calls [`EmbeddingsProvider::embed`] once per text;
    /// providers with a native batch endpoint should override it.
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, IndexError>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        })
    }
}

pub mod ollama;
