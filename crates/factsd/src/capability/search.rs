//! Web search client (Serper-style JSON API).

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use super::{Snippet, WebSearch};

pub struct SearchClient {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl SearchClient {
    pub fn new(url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            url: url.to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(&self, query: &str, top_n: usize) -> Result<Vec<Snippet>> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&json!({ "q": query, "num": top_n }));
        if let Some(key) = &self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("search request failed: {}", response.status()));
        }

        let data: serde_json::Value = response.json().await?;
        let organic = data
            .get("organic")
            .and_then(|o| o.as_array())
            .cloned()
            .unwrap_or_default();

        let snippets = organic
            .iter()
            .take(top_n)
            .map(|item| Snippet {
                // Response shapes vary; fall back from snippet to description
                snippet: item
                    .get("snippet")
                    .or_else(|| item.get("description"))
                    .and_then(|s| s.as_str())
                    .unwrap_or("")
                    .to_string(),
                link: item
                    .get("link")
                    .and_then(|l| l.as_str())
                    .unwrap_or("")
                    .to_string(),
                title: item
                    .get("title")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string(),
            })
            .collect();
        Ok(snippets)
    }
}
