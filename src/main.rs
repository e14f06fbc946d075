use std::error::Error;
use std::sync::Arc;

use api::{AppConfig, AppError, AppState, VectorBackend};
use embed_service::{OllamaService, config_ollama_embedding};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vector_index::{
    EmbeddingsProvider, MemoryStore, OllamaEmbedder, PointStore, QdrantFacade, SearchClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    if let Err(err) = dotenvy::dotenv() {
        eprintln!(".env not loaded: {err}");
    }

    tracing_subscriber::registry()
        .with(embed_service::telemetry::env_filter_with_level(
            "info",
            &["vector_index", "api"],
            Level::INFO,
        ))
        .with(embed_service::telemetry::layer())
        .init();

    let config = AppConfig::from_env().map_err(AppError::from)?;

    // --- Embedding model ---------------------------------------------------------
    let embed_cfg = config_ollama_embedding()?;
    info!(model = %embed_cfg.model, endpoint = %embed_cfg.endpoint, dim = embed_cfg.dim, "Embedding model configured");
    let ollama = Arc::new(OllamaService::new(embed_cfg)?);
    match ollama.has_model().await {
        Ok(true) => {}
        Ok(false) => warn!(model = %ollama.config().model, "Embedding model is not pulled on the Ollama server"),
        Err(err) => warn!(error = %err, "Ollama is not reachable yet"),
    }
    let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(OllamaEmbedder::new(ollama));

    // --- Vector store ------------------------------------------------------------
    let store: Arc<dyn PointStore> = match config.vector_backend {
        VectorBackend::Qdrant => {
            info!(url = %config.qdrant_url, "Using Qdrant vector store");
            Arc::new(QdrantFacade::new(&config.index_config())?)
        }
        VectorBackend::Memory => {
            warn!("Using in-memory vector store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let search = Arc::new(SearchClient::new(store, embedder, config.batch_size));
    let state = Arc::new(AppState::new(config, search));

    api::start(state).await?;

    Ok(())
}
