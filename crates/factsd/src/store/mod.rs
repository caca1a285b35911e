//! Store adapters: the document store and the vector index.
//!
//! The document store is the source of truth for the full fact record; the
//! vector index carries a denormalized copy (vector + full payload) for
//! similarity search. Both sit behind trait objects so agents take injected
//! handles and tests can substitute in-memory doubles.

use async_trait::async_trait;

use facts_common::{Fact, StoreError};

mod qdrant;
mod sqlite;

pub use qdrant::QdrantHttpIndex;
pub use sqlite::SqliteDocStore;

/// Keyed document store over fact records. `upsert` is a full-record
/// replace; callers always pass the complete record.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, fact_id: &str) -> Result<Option<Fact>, StoreError>;
    async fn upsert(&self, fact: &Fact) -> Result<(), StoreError>;
    async fn delete(&self, fact_id: &str) -> Result<(), StoreError>;
    async fn scan_all(&self) -> Result<Vec<Fact>, StoreError>;
}

/// One similarity-search hit. The payload is absent when the stored point
/// carries none or it no longer deserializes as a fact.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub payload: Option<Fact>,
    pub score: f32,
}

/// Vector index over fact embeddings, keyed by fact id.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if it does not exist. One-time bootstrap,
    /// called at startup, not part of the runtime lifecycle.
    async fn ensure_collection(&self, dimension: usize) -> Result<(), StoreError>;

    async fn upsert_point(
        &self,
        fact_id: &str,
        vector: &[f32],
        payload: &Fact,
    ) -> Result<(), StoreError>;

    async fn query_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPoint>, StoreError>;

    /// Delete every point whose payload field equals the given value.
    async fn delete_where(&self, field: &str, value: &str) -> Result<(), StoreError>;

    /// Number of points currently in the collection.
    async fn count(&self) -> Result<u64, StoreError>;
}
