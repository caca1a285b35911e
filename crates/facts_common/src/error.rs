//! Store error taxonomy.
//!
//! Document-store failures are primary: they propagate and the triggering
//! task is retried by the external queue. Vector-index failures are
//! secondary: agents catch them, log, and report degraded consistency
//! instead of failing the stage.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("record serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}
