//! Per-stage report types.
//!
//! Stages run asynchronously behind the task queue, so these reports are
//! what the worker logs and what tests assert on. A missing fact is a soft
//! outcome (`NotFound` arm), never an error. The `index_synced` /
//! `index_refreshed` flags distinguish the best-effort vector-index write
//! from the authoritative document-store write, so degraded-consistency
//! paths are visible without log inspection.

use serde::{Deserialize, Serialize};

use crate::fact::FactStatus;

/// One claim persisted by ingestion. `index_synced` is false when the
/// vector-index upsert failed and the fact exists only in the document
/// store until a later pass re-indexes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedFact {
    pub fact_id: String,
    pub natural_text: String,
    pub index_synced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub created: Vec<CreatedFact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerifyReport {
    NotFound {
        fact_id: String,
    },
    Scored {
        fact_id: String,
        score: f64,
        status: FactStatus,
        /// True when the production-band index refresh ran and succeeded.
        /// False when no refresh was due or when it failed (logged).
        index_refreshed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScoreReport {
    NotFound { fact_id: String },
    Evaluated { fact_id: String, admitted: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmitReport {
    NotFound { fact_id: String },
    Refreshed { fact_id: String, status: FactStatus },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneReport {
    pub pruned: usize,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerReport {
    pub answer: String,
    pub used_fact_ids: Vec<String>,
}
