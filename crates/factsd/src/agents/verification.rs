//! Verification stage: score a fact against web evidence and band its
//! status.
//!
//! Aggregates four components over the retrieved snippets - best rerank
//! relevance, domain consensus, best entailment probability, and a fixed
//! source-reliability placeholder - into a weighted score, then promotes,
//! keeps, or rejects the fact by threshold band.

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use facts_common::trust::{clamp01, verification_score, SOURCE_RELIABILITY};
use facts_common::{FactStatus, VerifyReport};

use crate::context::PipelineCtx;

/// Verify one fact. Soft-fails with `NotFound` when the document store has
/// no record; every capability failure degrades to a neutral component
/// value instead of aborting the stage.
pub async fn verify(ctx: &PipelineCtx, fact_id: &str) -> Result<VerifyReport> {
    let now = Utc::now();
    let Some(mut fact) = ctx.store.get(fact_id).await? else {
        warn!("verify: fact not found {}", fact_id);
        return Ok(VerifyReport::NotFound {
            fact_id: fact_id.to_string(),
        });
    };

    let snippets = match ctx
        .search
        .search(&fact.natural_text, ctx.config.lifecycle.search_snippets)
        .await
    {
        Ok(snippets) => snippets,
        Err(e) => {
            warn!("Web search failed for fact {}: {:#}", fact_id, e);
            Vec::new()
        }
    };

    if snippets.is_empty() {
        // No evidence: touch last_checked only, leave status and trust alone
        fact.last_checked = Some(now);
        let status = fact.status;
        ctx.store.upsert(&fact).await?;
        return Ok(VerifyReport::Scored {
            fact_id: fact_id.to_string(),
            score: 0.0,
            status,
            index_refreshed: false,
        });
    }

    let mut rerank_scores = Vec::with_capacity(snippets.len());
    let mut entail_probs = Vec::with_capacity(snippets.len());
    let mut domains = std::collections::HashSet::new();
    for snippet in &snippets {
        // The two calls per snippet are independent; run them together
        let (rerank, entail) = tokio::join!(
            rerank_snippet(ctx, &fact.natural_text, &snippet.snippet, fact_id),
            entailment_prob(ctx, &fact.natural_text, &snippet.snippet),
        );
        rerank_scores.push(rerank);
        entail_probs.push(entail);
        if !snippet.link.is_empty() {
            domains.insert(source_domain(&snippet.link).to_string());
        }
    }

    let max_rerank = rerank_scores.iter().cloned().fold(0.0, f64::max);
    let consensus_frac = domains.len() as f64 / snippets.len().max(1) as f64;
    let entail_prob = entail_probs.iter().cloned().fold(0.0, f64::max);
    let score = verification_score(max_rerank, consensus_frac, entail_prob, SOURCE_RELIABILITY);

    fact.record_web_check(score, snippets.len(), now);

    let mut index_refreshed = false;
    if score >= ctx.config.lifecycle.verify_high {
        fact.status = FactStatus::Production;
        fact.set_trust(score);
        // Refresh the index copy so the production vector is current
        index_refreshed = refresh_index(ctx, &fact).await;
    } else if score > ctx.config.lifecycle.verify_low {
        fact.status = FactStatus::Staging;
        fact.set_trust(score);
    } else {
        fact.status = FactStatus::Rejected;
        fact.set_trust(score);
    }

    let status = fact.status;
    ctx.store.upsert(&fact).await?;
    info!(
        "Verified fact {}: score {:.3}, status {}",
        fact_id, score, status
    );

    Ok(VerifyReport::Scored {
        fact_id: fact_id.to_string(),
        score,
        status,
        index_refreshed,
    })
}

async fn rerank_snippet(ctx: &PipelineCtx, claim: &str, snippet: &str, fact_id: &str) -> f64 {
    match ctx.reranker.score(claim, snippet).await {
        Ok(score) => score,
        Err(e) => {
            warn!("Reranker failed for {}: {:#}", fact_id, e);
            0.0
        }
    }
}

/// Ask the generation capability to rate snippet support for the claim on a
/// 0.0-1.0 scale. Call or parse failure falls back to 0.5.
async fn entailment_prob(ctx: &PipelineCtx, claim: &str, snippet: &str) -> f64 {
    let prompt = format!(
        "Rate how strongly the following snippet supports the claim on a scale 0.0-1.0.\n\n\
         Claim: {}\n\nSnippet: {}\n\n\
         Answer with a single number between 0.0 and 1.0 (e.g., 0.75).",
        claim, snippet
    );
    match ctx.generator.generate(&prompt, 32).await {
        Ok(response) => parse_rating(&response).unwrap_or(0.5),
        Err(e) => {
            error!("Entailment call failed: {:#}", e);
            0.5
        }
    }
}

/// First whitespace token that parses as a float, clamped to [0, 1].
fn parse_rating(response: &str) -> Option<f64> {
    response
        .split_whitespace()
        .filter_map(|token| {
            token
                .trim_matches(|c| c == '.' || c == ',')
                .parse::<f64>()
                .ok()
        })
        .next()
        .map(clamp01)
}

/// Host segment of a link: the part after the second '/'.
fn source_domain(link: &str) -> &str {
    if link.contains('/') {
        link.split('/').nth(2).unwrap_or(link)
    } else {
        link
    }
}

async fn refresh_index(ctx: &PipelineCtx, fact: &facts_common::Fact) -> bool {
    let vector = match ctx.embedder.embed(&fact.natural_text).await {
        Ok(vector) => vector,
        Err(e) => {
            error!(
                "Re-embedding failed during verification for {}: {:#}",
                fact.fact_id, e
            );
            return false;
        }
    };
    match ctx.index.upsert_point(&fact.fact_id, &vector, fact).await {
        Ok(()) => true,
        Err(e) => {
            error!(
                "Index refresh failed during verification for {}: {}",
                fact.fact_id, e
            );
            false
        }
    }
}
