//! Task worker: the queue boundary in front of the lifecycle stages.
//!
//! Stage handlers are plain functions; this module carries their inputs as
//! opaque task payloads over a channel, so the trigger surface stays
//! decoupled from handler internals. Delivery is at-least-once from the
//! callers' perspective: a handler that fails is logged and left for the
//! next trigger, since every stage recomputes from current store state.
//! Tasks for distinct facts run concurrently; nothing serializes work on
//! the same fact id, and the document store resolves races as last write
//! wins.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::agents;
use crate::context::PipelineCtx;

/// One unit of lifecycle work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    Ingest {
        user_id: String,
        session_id: String,
        text: String,
    },
    Verify {
        fact_id: String,
    },
    Score {
        fact_id: String,
    },
    Admit {
        fact_id: String,
    },
    Prune,
}

impl Task {
    fn kind(&self) -> &'static str {
        match self {
            Task::Ingest { .. } => "ingest",
            Task::Verify { .. } => "verify",
            Task::Score { .. } => "score",
            Task::Admit { .. } => "admit",
            Task::Prune => "prune",
        }
    }
}

#[derive(Debug)]
struct QueuedTask {
    task_id: String,
    task: Task,
}

/// Clonable submission handle held by the HTTP surface.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<QueuedTask>,
}

impl TaskQueue {
    /// Enqueue a task and return its opaque reference.
    pub fn submit(&self, task: Task) -> Result<String> {
        let task_id = Uuid::new_v4().to_string();
        self.tx
            .send(QueuedTask {
                task_id: task_id.clone(),
                task,
            })
            .map_err(|_| anyhow!("task worker is not running"))?;
        Ok(task_id)
    }
}

/// Start the worker loop and return the submission handle.
pub fn spawn(ctx: Arc<PipelineCtx>) -> TaskQueue {
    let (tx, mut rx) = mpsc::unbounded_channel::<QueuedTask>();
    tokio::spawn(async move {
        while let Some(queued) = rx.recv().await {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                run_task(&ctx, queued).await;
            });
        }
        info!("Task channel closed, worker stopping");
    });
    TaskQueue { tx }
}

async fn run_task(ctx: &PipelineCtx, queued: QueuedTask) {
    let kind = queued.task.kind();
    match dispatch(ctx, queued.task).await {
        Ok(report) => info!("Task {} ({}) completed: {}", queued.task_id, kind, report),
        Err(e) => error!("Task {} ({}) failed: {:#}", queued.task_id, kind, e),
    }
}

async fn dispatch(ctx: &PipelineCtx, task: Task) -> Result<serde_json::Value> {
    let report = match task {
        Task::Ingest {
            user_id,
            session_id,
            text,
        } => serde_json::to_value(agents::ingestion::ingest(ctx, &user_id, &session_id, &text).await?)?,
        Task::Verify { fact_id } => {
            serde_json::to_value(agents::verification::verify(ctx, &fact_id).await?)?
        }
        Task::Score { fact_id } => {
            serde_json::to_value(agents::scoring::score(ctx, &fact_id).await?)?
        }
        Task::Admit { fact_id } => {
            serde_json::to_value(agents::memory::admit(ctx, &fact_id).await?)?
        }
        Task::Prune => serde_json::to_value(agents::pruning::prune_all(ctx).await?)?,
    };
    Ok(report)
}
