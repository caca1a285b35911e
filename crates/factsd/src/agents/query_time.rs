//! Query-time answering: embed, retrieve, rerank, generate.
//!
//! The read path. Touches only the vector index and the capability
//! clients; independent of the write path except through eventual index
//! consistency. No caching - every call re-embeds and re-ranks.

use std::cmp::Ordering;

use anyhow::Result;
use tracing::warn;

use facts_common::{AnswerReport, Fact};

use crate::context::PipelineCtx;

pub async fn answer(ctx: &PipelineCtx, query: &str, top_k: usize) -> Result<AnswerReport> {
    let vector = ctx.embedder.embed(query).await?;
    let hits = ctx.index.query_nearest(&vector, top_k).await?;

    let mut reranked: Vec<(Fact, f64)> = Vec::new();
    for hit in hits {
        let Some(fact) = hit.payload else { continue };
        let score = match ctx.reranker.score(query, &fact.natural_text).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Reranker failed at query time: {:#}", e);
                0.0
            }
        };
        if score > 0.0 {
            reranked.push((fact, score));
        }
    }

    reranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    reranked.truncate(top_k);

    let mut prompt = String::from("Use the following facts to answer the query:\n");
    for (fact, _) in &reranked {
        prompt.push_str(&format!("- {} (trust={})\n", fact.natural_text, fact.trust));
    }
    prompt.push_str(&format!("\nUser Query: {}\nAnswer:\n", query));

    let answer = ctx
        .generator
        .generate(&prompt, ctx.config.capabilities.generation_max_tokens)
        .await?;

    Ok(AnswerReport {
        answer,
        used_fact_ids: reranked.into_iter().map(|(fact, _)| fact.fact_id).collect(),
    })
}
