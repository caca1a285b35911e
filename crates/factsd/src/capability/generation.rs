//! Text generation client and the claim extraction operation built on it.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{ClaimCandidate, Generator};

pub struct GenerationClient {
    base_url: String,
    client: reqwest::Client,
}

impl GenerationClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&json!({ "prompt": prompt, "max_tokens": max_tokens }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("generation request failed: {}", response.status()));
        }

        let data: serde_json::Value = response.json().await?;
        let text = data
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .to_string();
        Ok(text)
    }
}

/// Extract atomic claims from free text via the generation capability.
///
/// The model is asked for one JSON object per line. Lines that do not parse
/// are skipped; if the model produced output but no line parsed, the whole
/// input is kept as a single unstructured claim so ingestion still captures
/// it. An empty generation yields no claims.
pub async fn extract_claims(generator: &dyn Generator, text: &str) -> Result<Vec<ClaimCandidate>> {
    let prompt = format!(
        "Extract the atomic factual claims from the text below. \
         Respond with one JSON object per line, each with a \"natural_text\" \
         field and optional \"subject\", \"predicate\" and \"object\" fields. \
         Respond with nothing if the text contains no factual claims.\n\n\
         Text: {}",
        text
    );
    let response = generator.generate(&prompt, 512).await?;

    let mut claims = parse_claim_lines(&response);
    if claims.is_empty() && !response.trim().is_empty() {
        warn!("Claim extraction produced no parseable claims, keeping whole text");
        claims.push(ClaimCandidate {
            natural_text: text.to_string(),
            ..ClaimCandidate::default()
        });
    }
    Ok(claims)
}

/// Parse one JSON claim object per line, skipping anything that does not
/// parse or carries no text.
fn parse_claim_lines(response: &str) -> Vec<ClaimCandidate> {
    response
        .lines()
        .filter_map(|line| serde_json::from_str::<ClaimCandidate>(line.trim()).ok())
        .filter(|claim| !claim.natural_text.is_empty())
        .collect()
}
