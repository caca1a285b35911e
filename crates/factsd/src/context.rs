//! Shared pipeline context: injected store and capability handles.
//!
//! Every stage handler takes a `PipelineCtx` instead of reaching for
//! globals, so tests run the full pipeline against in-memory doubles.

use std::sync::Arc;

use facts_common::Config;

use crate::capability::{Embedder, Generator, Reranker, WebSearch};
use crate::store::{DocumentStore, VectorIndex};

pub struct PipelineCtx {
    pub store: Arc<dyn DocumentStore>,
    pub index: Arc<dyn VectorIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub reranker: Arc<dyn Reranker>,
    pub generator: Arc<dyn Generator>,
    pub search: Arc<dyn WebSearch>,
    pub config: Config,
}
