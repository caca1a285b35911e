//! The fact record - the central entity of the lifecycle pipeline.
//!
//! A fact is an atomic claim extracted from text. It is created in staging,
//! advanced or demoted by verification and scoring, mirrored into the vector
//! index for retrieval, and eventually destroyed by pruning. The document
//! store holds the authoritative record; the index holds a denormalized copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trust::{clamp01, INITIAL_TRUST};

/// Lifecycle status of a fact. Only `production` facts are considered
/// authoritative by readers, but facts are indexed at every stage - status
/// is carried as payload metadata, not used as an index filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactStatus {
    /// Newly ingested or weakly verified, awaiting confirmation
    Staging,
    /// Verified or confirmed, authoritative for answering
    Production,
    /// Verification scored below the low threshold
    Rejected,
}

impl FactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactStatus::Staging => "staging",
            FactStatus::Production => "production",
            FactStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "production" => FactStatus::Production,
            "rejected" => FactStatus::Rejected,
            _ => FactStatus::Staging,
        }
    }
}

impl std::fmt::Display for FactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance record. The list on a fact is append-only; records are never
/// rewritten once added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceRecord {
    /// Created from a chat ingestion request
    Chat {
        user_id: String,
        session_id: String,
        ts: DateTime<Utc>,
    },
    /// A verification pass against web search results
    WebCheck {
        score: f64,
        ts: DateTime<Utc>,
        snippet_count: usize,
    },
}

/// An atomic claim with lifecycle state and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Unique id, generated at creation, immutable. Join key between the
    /// document store and the vector index.
    pub fact_id: String,
    /// Canonical string form of the claim; drives embeddings and prompts.
    pub natural_text: String,
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    pub status: FactStatus,
    /// Confidence in [0, 1]. Decays over time, boosted by verification and
    /// confirmation.
    pub trust: f64,
    pub sources: Vec<SourceRecord>,
    pub first_seen: DateTime<Utc>,
    /// Most recent verification/scoring pass; None until first check.
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verification_score: Option<f64>,
}

impl Fact {
    /// Create a staging fact from an extracted claim.
    pub fn from_claim(
        natural_text: String,
        subject: Option<String>,
        predicate: Option<String>,
        object: Option<String>,
        user_id: &str,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            fact_id: Uuid::new_v4().to_string(),
            natural_text,
            subject,
            predicate,
            object,
            status: FactStatus::Staging,
            trust: INITIAL_TRUST,
            sources: vec![SourceRecord::Chat {
                user_id: user_id.to_string(),
                session_id: session_id.to_string(),
                ts: now,
            }],
            first_seen: now,
            last_checked: None,
            last_verification_score: None,
        }
    }

    /// Set trust, clamped into [0, 1].
    pub fn set_trust(&mut self, trust: f64) {
        self.trust = clamp01(trust);
    }

    /// Append a web-check provenance record and remember the score.
    pub fn record_web_check(&mut self, score: f64, snippet_count: usize, now: DateTime<Utc>) {
        self.sources.push(SourceRecord::WebCheck {
            score,
            ts: now,
            snippet_count,
        });
        self.last_verification_score = Some(score);
        self.last_checked = Some(now);
    }

    /// Age in seconds for decay purposes: time since the last check, or
    /// since creation if the fact was never checked. Clamped at zero so
    /// clock skew cannot produce negative ages.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> f64 {
        let anchor = self.last_checked.unwrap_or(self.first_seen);
        (now - anchor).num_seconds().max(0) as f64
    }
}
