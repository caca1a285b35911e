//! Remote capability clients: embedding, reranking, generation, web search.
//!
//! Each capability is a trait so the lifecycle agents take injected handles
//! and tests can script behavior, including failures. The production
//! implementations are thin HTTP clients with explicit timeouts; a timeout
//! is treated like any other capability failure by the callers.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod embedding;
mod generation;
mod reranker;
mod search;

pub use embedding::EmbeddingClient;
pub use generation::{extract_claims, GenerationClient};
pub use reranker::RerankerClient;
pub use search::SearchClient;

/// Text embedding. The returned vector's dimensionality must match the
/// index's configured dimension; a mismatch is a deployment error.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Query/document relevance scoring. Higher is more relevant; the contract
/// guarantees no fixed range, though scores are practically in [0, 1].
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn score(&self, query: &str, document: &str) -> Result<f64>;
}

/// Free-form text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub snippet: String,
    pub link: String,
    pub title: String,
}

/// Web search capability.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, top_n: usize) -> Result<Vec<Snippet>>;
}

/// A claim extracted from ingested text, before it becomes a fact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimCandidate {
    #[serde(default)]
    pub natural_text: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}
