//! Facts Common - shared types for the fact lifecycle pipeline.
//!
//! The fact record and its provenance, the trust/decay/verification math,
//! the per-stage report types, the store error taxonomy, and configuration.

pub mod config;
pub mod error;
pub mod fact;
pub mod report;
pub mod trust;

pub use config::Config;
pub use error::StoreError;
pub use fact::{Fact, FactStatus, SourceRecord};
pub use report::{
    AdmitReport, AnswerReport, CreatedFact, IngestReport, PruneReport, ScoreReport, VerifyReport,
};
