//! Admission stage: idempotent index refresh.

use anyhow::Result;
use tracing::warn;

use facts_common::AdmitReport;

use crate::context::PipelineCtx;

/// Re-embed the fact and re-upsert both stores without mutating any field.
/// Guarantees index freshness independent of status transitions; safe to
/// run any number of times. Embedding and upsert failures propagate so the
/// queue retries - there is no useful degraded form of a refresh.
pub async fn admit(ctx: &PipelineCtx, fact_id: &str) -> Result<AdmitReport> {
    let Some(fact) = ctx.store.get(fact_id).await? else {
        warn!("admit: fact not found {}", fact_id);
        return Ok(AdmitReport::NotFound {
            fact_id: fact_id.to_string(),
        });
    };

    let vector = ctx.embedder.embed(&fact.natural_text).await?;
    ctx.index
        .upsert_point(&fact.fact_id, &vector, &fact)
        .await?;
    ctx.store.upsert(&fact).await?;

    Ok(AdmitReport::Refreshed {
        fact_id: fact_id.to_string(),
        status: fact.status,
    })
}
