//! HTTP server for factsd

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::context::PipelineCtx;
use crate::routes;
use crate::worker::TaskQueue;

/// Application state shared across handlers
pub struct AppState {
    pub ctx: Arc<PipelineCtx>,
    pub queue: TaskQueue,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(ctx: Arc<PipelineCtx>, queue: TaskQueue) -> Self {
        Self {
            ctx,
            queue,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.ctx.config.server.bind_addr.clone();
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::pipeline_routes())
        .merge(routes::query_routes())
        .merge(routes::health_routes())
        .merge(routes::stats_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
