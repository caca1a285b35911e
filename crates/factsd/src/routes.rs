//! API routes for factsd
//!
//! The five lifecycle stages are triggered over HTTP and processed
//! asynchronously by the task worker; the trigger response only
//! acknowledges acceptance, and callers observe the outcome through the
//! fact's stored state. Query answering is synchronous.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use facts_common::{AnswerReport, FactStatus};

use crate::server::AppState;
use crate::worker::Task;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Lifecycle Trigger Routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub user_id: String,
    pub session_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FactIdRequest {
    pub fact_id: String,
}

#[derive(Debug, Serialize)]
pub struct TaskAccepted {
    pub status: &'static str,
    pub task_id: String,
}

pub fn pipeline_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/ingest", post(ingest))
        .route("/v1/verify", post(verify))
        .route("/v1/score", post(score))
        .route("/v1/admit", post(admit))
        .route("/v1/prune", post(prune))
}

fn submit(
    state: &AppState,
    task: Task,
    status: &'static str,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    let task_id = state.queue.submit(task).map_err(|e| {
        error!("Task submit failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok((StatusCode::ACCEPTED, Json(TaskAccepted { status, task_id })))
}

async fn ingest(
    State(state): State<AppStateArc>,
    Json(req): Json<IngestRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    submit(
        &state,
        Task::Ingest {
            user_id: req.user_id,
            session_id: req.session_id,
            text: req.text,
        },
        "accepted",
    )
}

async fn verify(
    State(state): State<AppStateArc>,
    Json(req): Json<FactIdRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    submit(&state, Task::Verify { fact_id: req.fact_id }, "accepted")
}

async fn score(
    State(state): State<AppStateArc>,
    Json(req): Json<FactIdRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    submit(&state, Task::Score { fact_id: req.fact_id }, "accepted")
}

async fn admit(
    State(state): State<AppStateArc>,
    Json(req): Json<FactIdRequest>,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    submit(&state, Task::Admit { fact_id: req.fact_id }, "accepted")
}

async fn prune(
    State(state): State<AppStateArc>,
) -> Result<(StatusCode, Json<TaskAccepted>), (StatusCode, String)> {
    submit(&state, Task::Prune, "prune_scheduled")
}

// ============================================================================
// Query Route
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub fn query_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/query", post(query))
}

async fn query(
    State(state): State<AppStateArc>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<AnswerReport>, (StatusCode, String)> {
    let top_k = req.top_k.unwrap_or(state.ctx.config.lifecycle.query_top_k);
    let report = crate::agents::query_time::answer(&state.ctx, &req.query, top_k)
        .await
        .map_err(|e| {
            error!("Query answering failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(report))
}

// ============================================================================
// Health Route
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Stats Route
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub facts_total: usize,
    pub staging: usize,
    pub production: usize,
    pub rejected: usize,
    /// None when the index could not be reached
    pub index_points: Option<u64>,
}

pub fn stats_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/stats", get(stats))
}

async fn stats(
    State(state): State<AppStateArc>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let facts = state.ctx.store.scan_all().await.map_err(|e| {
        error!("Stats scan failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let count_status =
        |status: FactStatus| facts.iter().filter(|f| f.status == status).count();

    let index_points = match state.ctx.index.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Index count unavailable: {}", e);
            None
        }
    };

    Ok(Json(StatsResponse {
        facts_total: facts.len(),
        staging: count_status(FactStatus::Staging),
        production: count_status(FactStatus::Production),
        rejected: count_status(FactStatus::Rejected),
        index_points,
    }))
}
