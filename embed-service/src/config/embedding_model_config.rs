/// Configuration for an embedding model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"all-minilm"`).
/// - `endpoint`: Base URL of the inference server.
/// - `dim`: Expected vector dimensionality; responses of another size are rejected.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use embed_service::EmbeddingModelConfig;
///
/// let cfg = EmbeddingModelConfig {
///     model: "all-minilm".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     dim: 384,
///     timeout_secs: Some(30),
/// };
/// assert_eq!(cfg.dim, 384);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Inference endpoint (local server or remote API URL).
    pub endpoint: String,

    /// Vector dimensionality produced by `model`.
    pub dim: usize,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
