//! Reranker service client (TEI-style HTTP API).

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use super::Reranker;

pub struct RerankerClient {
    base_url: String,
    client: reqwest::Client,
}

impl RerankerClient {
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
impl Reranker for RerankerClient {
    async fn score(&self, query: &str, document: &str) -> Result<f64> {
        let response = self
            .client
            .post(format!("{}/rerank", self.base_url))
            .json(&json!({ "query": query, "documents": [document] }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("rerank request failed: {}", response.status()));
        }

        let data: serde_json::Value = response.json().await?;
        let score = data
            .get("scores")
            .and_then(|s| s.as_array())
            .and_then(|s| s.first())
            .and_then(|s| s.as_f64())
            .unwrap_or(0.0);
        Ok(score)
    }
}
