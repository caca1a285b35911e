//! Pruning stage: decay trust and remove facts that fell below threshold.
//!
//! A full scan over the document store - a maintenance batch job, not a hot
//! path. Decayed trust is written back to the document store only; the
//! index copy picks up trust changes on promotion paths.

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use facts_common::trust::decay;
use facts_common::PruneReport;

use crate::context::PipelineCtx;

pub async fn prune_all(ctx: &PipelineCtx) -> Result<PruneReport> {
    let now = Utc::now();
    let half_life = ctx.config.lifecycle.decay_half_life_secs as f64;
    let threshold = ctx.config.lifecycle.prune_threshold;

    let facts = ctx.store.scan_all().await?;
    let mut ids = Vec::new();

    for mut fact in facts {
        let age = fact.age_seconds(now);
        let new_trust = decay(fact.trust, age, half_life);

        if new_trust < threshold {
            ctx.store.delete(&fact.fact_id).await?;
            // Document-store deletion is what counts as pruned; the index
            // delete is best-effort and self-heals on the next write pass
            if let Err(e) = ctx.index.delete_where("fact_id", &fact.fact_id).await {
                error!("Failed to delete fact {} from index: {}", fact.fact_id, e);
            }
            ids.push(fact.fact_id);
        } else {
            fact.set_trust(new_trust);
            ctx.store.upsert(&fact).await?;
        }
    }

    info!("Pruned {} facts", ids.len());
    Ok(PruneReport {
        pruned: ids.len(),
        ids,
    })
}
