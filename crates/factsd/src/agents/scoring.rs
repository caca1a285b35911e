//! Scoring stage: confirmation check and production promotion.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use facts_common::trust::{CONFIRM_BOOST, PLACEHOLDER_CONFIRMATIONS};
use facts_common::{FactStatus, ScoreReport};

use crate::context::PipelineCtx;

/// Evaluate a staged fact for production admission. A confirmed fact is
/// promoted, its trust boosted, and its index copy refreshed; anything else
/// just gets its `last_checked` touched.
///
/// The confirmation count is still the placeholder constant; until real
/// cross-store counting lands, every fact passes that half of the gate and
/// admission hinges on the trust threshold.
pub async fn score(ctx: &PipelineCtx, fact_id: &str) -> Result<ScoreReport> {
    let now = Utc::now();
    let Some(mut fact) = ctx.store.get(fact_id).await? else {
        warn!("score: fact not found {}", fact_id);
        return Ok(ScoreReport::NotFound {
            fact_id: fact_id.to_string(),
        });
    };

    let confirmations = PLACEHOLDER_CONFIRMATIONS;

    if confirmations >= ctx.config.lifecycle.staging_confirm_k
        && fact.trust >= ctx.config.lifecycle.verify_low
    {
        fact.status = FactStatus::Production;
        fact.set_trust(fact.trust + CONFIRM_BOOST);
        // Promotion refreshes the index copy before the document write;
        // failures propagate so the queue retries the whole stage.
        let vector = ctx.embedder.embed(&fact.natural_text).await?;
        ctx.index
            .upsert_point(&fact.fact_id, &vector, &fact)
            .await?;
        fact.last_checked = Some(now);
        ctx.store.upsert(&fact).await?;
        info!("Admitted fact {} to production (trust {:.3})", fact_id, fact.trust);
        return Ok(ScoreReport::Evaluated {
            fact_id: fact_id.to_string(),
            admitted: true,
        });
    }

    fact.last_checked = Some(now);
    ctx.store.upsert(&fact).await?;
    Ok(ScoreReport::Evaluated {
        fact_id: fact_id.to_string(),
        admitted: false,
    })
}
