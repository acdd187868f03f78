mod assessment;
mod competency;
mod config;
mod documents;
mod errors;
mod extraction;
mod llm_client;
mod retrieval;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::competency::mapper::load_mapping;
use crate::competency::seed::default_mapping;
use crate::config::Config;
use crate::llm_client::embeddings::{Embedder, EmbeddingClient, HashingEmbedder};
use crate::llm_client::{LlmClient, LlmSettings};
use crate::retrieval::VectorIndex;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SKJ assessor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        LlmSettings {
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            timeout_secs: config.llm_timeout_secs,
        },
    )?;
    info!("LLM client initialized (model: {})", config.llm_model);

    let embedder = build_embedder(&config)?;

    let state = AppState::new(Arc::new(llm), embedder, config.clone(), default_mapping());
    restore_artifacts(&state).await?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS once the frontend origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Remote embeddings when an endpoint is configured, local hashing otherwise.
fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match &config.embedding_base_url {
        Some(base_url) => {
            let client = EmbeddingClient::new(
                base_url,
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
                config.embedding_dimension,
                config.llm_timeout_secs,
            )?;
            info!(
                "Embedding client initialized (model: {}, dim {})",
                config.embedding_model, config.embedding_dimension
            );
            Ok(Arc::new(client))
        }
        None => {
            warn!(
                "EMBEDDING_BASE_URL not set, using local hashing embedder (dim {})",
                config.embedding_dimension
            );
            Ok(Arc::new(HashingEmbedder::new(config.embedding_dimension)))
        }
    }
}

/// Picks up the mapping and index persisted by earlier runs.
async fn restore_artifacts(state: &AppState) -> Result<()> {
    let mapping = load_mapping(&state.store.mapping_path())?;
    if !mapping.is_empty() {
        info!("Restored mapping of {} jobs", mapping.len());
        state.replace_mapping(mapping).await;
    }

    match VectorIndex::load(&state.store.index_path())? {
        Some(index) if !index.compatible_with(state.embedder.as_ref()) => {
            warn!(
                "Stored index was built by '{}', current embedder is '{}'; rebuild required",
                index.embedder(),
                state.embedder.identity()
            );
        }
        Some(index) => {
            info!("Restored vector index: {} chunks", index.len());
            state.replace_index(Arc::new(index)).await;
        }
        None => info!("No vector index on disk; POST /api/v1/index/build to create one"),
    }
    Ok(())
}
