//! HTTP facade over [`vector_index::SearchClient`].
//!
//! Every route takes query-string parameters; `indexing_data` additionally
//! takes the CSV upload as multipart field `file`. Bodies are wrapped as
//! `{"output": ...}` except for `add_point`.

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

pub use crate::core::app_state::{AppConfig, AppState, ConfigError, VectorBackend};
pub use crate::error_handler::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};
use tokio::signal;
use tracing::info;

use crate::middleware_layer::rejection_mapper::rejection_mapper;
use crate::routes::{
    collections::{
        create_collection_route::create_collection, delete_collection_route::delete_collection,
    },
    indexing::indexing_data_route::indexing_data,
    points::{
        add_point_route::add_point, delete_point_route::delete_point,
        edit_point_route::edit_point,
    },
    search::search_route::search,
};

/// Largest accepted CSV upload.
const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// Builds the application router with all routes and middleware attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/create_collection", post(create_collection))
        .route("/api/indexing_data", post(indexing_data))
        .route("/api/add_point", post(add_point))
        .route("/api/search", get(search))
        .route("/api/delete_point", post(delete_point))
        .route("/api/edit_point", put(edit_point))
        .route("/api/delete_collection", delete(delete_collection))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(middleware::from_fn(rejection_mapper))
        .with_state(state)
}

/// Binds `state.config.api_address` and serves until Ctrl+C.
pub async fn start(state: Arc<AppState>) -> AppResult<()> {
    let addr = state.config.api_address.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        // Without a signal handler keep serving rather than exiting immediately.
        std::future::pending::<()>().await;
    }
}
