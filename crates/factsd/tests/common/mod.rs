//! In-memory doubles for the stores and capabilities, so the pipeline runs
//! end to end without a database, an index server, or any model service.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use facts_common::{Config, Fact, StoreError};
use factsd::capability::{ClaimCandidate, Embedder, Generator, Reranker, Snippet, WebSearch};
use factsd::context::PipelineCtx;
use factsd::store::{DocumentStore, ScoredPoint, VectorIndex};

// ============================================================================
// Store Doubles
// ============================================================================

#[derive(Default)]
pub struct MemoryDocStore {
    facts: Mutex<BTreeMap<String, Fact>>,
    pub fail_writes: AtomicBool,
}

impl MemoryDocStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, fact: Fact) {
        self.facts.lock().unwrap().insert(fact.fact_id.clone(), fact);
    }

    pub fn len(&self) -> usize {
        self.facts.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocStore {
    async fn get(&self, fact_id: &str) -> Result<Option<Fact>, StoreError> {
        Ok(self.facts.lock().unwrap().get(fact_id).cloned())
    }

    async fn upsert(&self, fact: &Fact) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("document store offline".to_string()));
        }
        self.insert(fact.clone());
        Ok(())
    }

    async fn delete(&self, fact_id: &str) -> Result<(), StoreError> {
        self.facts.lock().unwrap().remove(fact_id);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Fact>, StoreError> {
        Ok(self.facts.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryIndex {
    points: Mutex<BTreeMap<String, (Vec<f32>, Fact)>>,
    pub fail_upserts: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl MemoryIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.points.lock().unwrap().len()
    }

    pub fn point(&self, fact_id: &str) -> Option<(Vec<f32>, Fact)> {
        self.points.lock().unwrap().get(fact_id).cloned()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn ensure_collection(&self, _dimension: usize) -> Result<(), StoreError> {
        Ok(())
    }

    async fn upsert_point(
        &self,
        fact_id: &str,
        vector: &[f32],
        payload: &Fact,
    ) -> Result<(), StoreError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("index offline".to_string()));
        }
        self.points
            .lock()
            .unwrap()
            .insert(fact_id.to_string(), (vector.to_vec(), payload.clone()));
        Ok(())
    }

    async fn query_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPoint>, StoreError> {
        let points = self.points.lock().unwrap();
        let mut hits: Vec<ScoredPoint> = points
            .values()
            .map(|(v, fact)| ScoredPoint {
                payload: Some(fact.clone()),
                score: dot(vector, v),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    async fn delete_where(&self, field: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("index offline".to_string()));
        }
        assert_eq!(field, "fact_id", "only fact_id filters are used");
        self.points.lock().unwrap().remove(value);
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.len() as u64)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

// ============================================================================
// Capability Doubles
// ============================================================================

/// Deterministic embedder: the vector depends only on the text, so repeated
/// embeds of the same fact are identical.
pub struct StubEmbedder {
    pub dimension: usize,
    pub fail: AtomicBool,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Arc<Self> {
        Arc::new(Self {
            dimension,
            fail: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("embedding backend offline"));
        }
        let seed = text.bytes().map(|b| b as u32).sum::<u32>() as f32;
        Ok((0..self.dimension)
            .map(|i| (seed + i as f32) / 1000.0)
            .collect())
    }
}

/// Reranker scripted per document text; unknown documents get the default.
pub struct StubReranker {
    pub scores: Mutex<HashMap<String, f64>>,
    pub default: f64,
    pub fail: AtomicBool,
}

impl StubReranker {
    pub fn with_default(default: f64) -> Arc<Self> {
        Arc::new(Self {
            scores: Mutex::new(HashMap::new()),
            default,
            fail: AtomicBool::new(false),
        })
    }

    pub fn script(&self, document: &str, score: f64) {
        self.scores
            .lock()
            .unwrap()
            .insert(document.to_string(), score);
    }
}

#[async_trait]
impl Reranker for StubReranker {
    async fn score(&self, _query: &str, document: &str) -> Result<f64> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("reranker offline"));
        }
        Ok(*self
            .scores
            .lock()
            .unwrap()
            .get(document)
            .unwrap_or(&self.default))
    }
}

/// Generator scripted by prompt kind: claim extraction, entailment rating,
/// and final answers are told apart by their prompt prefixes.
pub struct StubGenerator {
    pub claims_response: Mutex<String>,
    pub entailment_response: Mutex<String>,
    pub answer_response: Mutex<String>,
}

impl StubGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            claims_response: Mutex::new(String::new()),
            entailment_response: Mutex::new("0.5".to_string()),
            answer_response: Mutex::new("no answer scripted".to_string()),
        })
    }

    pub fn script_claims(&self, claims: &[ClaimCandidate]) {
        let lines: Vec<String> = claims
            .iter()
            .map(|c| serde_json::to_string(c).unwrap())
            .collect();
        *self.claims_response.lock().unwrap() = lines.join("\n");
    }

    pub fn script_entailment(&self, response: &str) {
        *self.entailment_response.lock().unwrap() = response.to_string();
    }

    pub fn script_answer(&self, response: &str) {
        *self.answer_response.lock().unwrap() = response.to_string();
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        if prompt.starts_with("Extract the atomic factual claims") {
            Ok(self.claims_response.lock().unwrap().clone())
        } else if prompt.starts_with("Rate how strongly") {
            Ok(self.entailment_response.lock().unwrap().clone())
        } else {
            Ok(self.answer_response.lock().unwrap().clone())
        }
    }
}

pub struct StubSearch {
    pub snippets: Mutex<Vec<Snippet>>,
    pub fail: AtomicBool,
}

impl StubSearch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            snippets: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    pub fn script(&self, snippets: Vec<Snippet>) {
        *self.snippets.lock().unwrap() = snippets;
    }
}

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, _query: &str, top_n: usize) -> Result<Vec<Snippet>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("search backend offline"));
        }
        let mut snippets = self.snippets.lock().unwrap().clone();
        snippets.truncate(top_n);
        Ok(snippets)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub const TEST_DIMENSION: usize = 8;

/// Everything a test needs to drive the pipeline and inspect both stores.
pub struct Harness {
    pub store: Arc<MemoryDocStore>,
    pub index: Arc<MemoryIndex>,
    pub embedder: Arc<StubEmbedder>,
    pub reranker: Arc<StubReranker>,
    pub generator: Arc<StubGenerator>,
    pub search: Arc<StubSearch>,
    pub ctx: PipelineCtx,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryDocStore::new();
        let index = MemoryIndex::new();
        let embedder = StubEmbedder::new(config.index.dimension);
        let reranker = StubReranker::with_default(0.0);
        let generator = StubGenerator::new();
        let search = StubSearch::new();

        let ctx = PipelineCtx {
            store: store.clone(),
            index: index.clone(),
            embedder: embedder.clone(),
            reranker: reranker.clone(),
            generator: generator.clone(),
            search: search.clone(),
            config,
        };

        Self {
            store,
            index,
            embedder,
            reranker,
            generator,
            search,
            ctx,
        }
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.index.dimension = TEST_DIMENSION;
    config
}

pub fn snippet(text: &str, link: &str) -> Snippet {
    Snippet {
        snippet: text.to_string(),
        link: link.to_string(),
        title: format!("result: {}", text),
    }
}

pub fn claim(text: &str) -> ClaimCandidate {
    ClaimCandidate {
        natural_text: text.to_string(),
        ..ClaimCandidate::default()
    }
}
