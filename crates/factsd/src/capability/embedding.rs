//! Embedding service client (TEI-style HTTP API).

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use super::Embedder;

pub struct EmbeddingClient {
    base_url: String,
    client: reqwest::Client,
}

impl EmbeddingClient {
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
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .json(&json!({ "inputs": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("embedding request failed: {}", response.status()));
        }

        let data: serde_json::Value = response.json().await?;
        let vector = data
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow!("embedding response missing 'embedding' field"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        Ok(vector)
    }
}
