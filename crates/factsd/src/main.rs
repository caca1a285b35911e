//! Facts Daemon - fact lifecycle pipeline service.
//!
//! Wires the document store, vector index, and capability clients into the
//! pipeline context, starts the task worker, and serves the HTTP surface.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn, Level};

use facts_common::Config;
use factsd::capability::{EmbeddingClient, GenerationClient, RerankerClient, SearchClient};
use factsd::context::PipelineCtx;
use factsd::server::{self, AppState};
use factsd::store::{QdrantHttpIndex, SqliteDocStore, VectorIndex};
use factsd::worker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("factsd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();

    let store = SqliteDocStore::open(&config.store.path).await?;
    let index = QdrantHttpIndex::new(&config.index)?;

    // Collection bootstrap is administrative; runtime writes degrade
    // gracefully until it succeeds on a later start
    if let Err(e) = index.ensure_collection(config.index.dimension).await {
        warn!("Vector index bootstrap failed: {}", e);
    }

    let timeout = config.capabilities.request_timeout_secs;
    let ctx = Arc::new(PipelineCtx {
        store: Arc::new(store),
        index: Arc::new(index),
        embedder: Arc::new(EmbeddingClient::new(
            &config.capabilities.embedding_url,
            timeout,
        )?),
        reranker: Arc::new(RerankerClient::new(
            &config.capabilities.reranker_url,
            timeout,
        )?),
        generator: Arc::new(GenerationClient::new(
            &config.capabilities.generation_url,
            timeout,
        )?),
        search: Arc::new(SearchClient::new(
            &config.capabilities.search_url,
            config.capabilities.search_api_key.clone(),
            timeout,
        )?),
        config,
    });

    let queue = worker::spawn(ctx.clone());

    server::run(AppState::new(ctx, queue)).await
}
