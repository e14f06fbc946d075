//! Embedding-model client shared by the search facade.
//!
//! - [`config`]: typed model configuration, resolved from environment variables.
//! - [`services::ollama_service`]: thin HTTP client for Ollama's `/api/embed`.
//! - [`error_handler`]: unified [`EmbedError`] plus env helpers.
//! - [`telemetry`]: a library-scoped `tracing-subscriber` layer.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_ollama_embedding;
pub use config::embedding_model_config::EmbeddingModelConfig;
pub use error_handler::{ConfigError, EmbedError, Result};
pub use services::ollama_service::OllamaService;
