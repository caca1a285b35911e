//! Lifecycle stage handlers.
//!
//! Five write-path stages (ingestion, verification, scoring, admission,
//! pruning) coordinate the fact state machine across the document store and
//! the vector index; query-time answering is the read path. Each stage is a
//! single-entry-point async function over the injected context, idempotent
//! under the at-least-once delivery of the external queue. Nothing here
//! locks across stages: concurrent passes on the same fact resolve as
//! last-write-wins, and the next pass recomputes from current state.

pub mod ingestion;
pub mod memory;
pub mod pruning;
pub mod query_time;
pub mod scoring;
pub mod verification;
