//! Ingestion stage: extract claims from text and create staging facts.

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use facts_common::{CreatedFact, Fact, IngestReport};

use crate::capability::extract_claims;
use crate::context::PipelineCtx;

/// Ingest a chat message: extract claims, embed each, persist to both
/// stores, and report the created facts.
///
/// A claim-extraction failure aborts the whole call. Everything after that
/// degrades per claim: an embedding failure substitutes a zero vector, an
/// index upsert failure is logged and reported as unsynced, and a
/// document-store failure drops that one claim without aborting the batch.
pub async fn ingest(
    ctx: &PipelineCtx,
    user_id: &str,
    session_id: &str,
    text: &str,
) -> Result<IngestReport> {
    let now = Utc::now();
    let claims = extract_claims(ctx.generator.as_ref(), text).await?;
    info!("Extracted {} claims from input", claims.len());

    let mut created = Vec::new();
    for claim in claims {
        let natural_text = if claim.natural_text.is_empty() {
            text.to_string()
        } else {
            claim.natural_text
        };

        let fact = Fact::from_claim(
            natural_text,
            claim.subject,
            claim.predicate,
            claim.object,
            user_id,
            session_id,
            now,
        );

        let vector = match ctx.embedder.embed(&fact.natural_text).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(
                    "Embedding failed for fact {}, indexing zero vector: {:#}",
                    fact.fact_id, e
                );
                vec![0.0; ctx.config.index.dimension]
            }
        };

        let index_synced = match ctx.index.upsert_point(&fact.fact_id, &vector, &fact).await {
            Ok(()) => true,
            Err(e) => {
                error!("Index upsert failed for {}: {}", fact.fact_id, e);
                false
            }
        };

        if let Err(e) = ctx.store.upsert(&fact).await {
            error!("Document write failed for {}, dropping claim: {}", fact.fact_id, e);
            continue;
        }

        created.push(CreatedFact {
            fact_id: fact.fact_id,
            natural_text: fact.natural_text,
            index_synced,
        });
    }

    Ok(IngestReport { created })
}
