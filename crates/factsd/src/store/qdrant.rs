//! Vector index adapter over the Qdrant HTTP API.
//!
//! Thin request/response mapping only; the engine itself is an external
//! collaborator. Every point is keyed by fact id and carries the full fact
//! record as payload, so a similarity hit can be used without a second
//! document-store read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::warn;

use facts_common::config::IndexConfig;
use facts_common::{Fact, StoreError};

use super::{ScoredPoint, VectorIndex};

pub struct QdrantHttpIndex {
    base_url: String,
    collection: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl QdrantHttpIndex {
    pub fn new(config: &IndexConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(StoreError::backend)?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }
        req
    }

    async fn expect_success(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(StoreError::Backend(format!(
                "{} failed: {}",
                what,
                resp.status()
            )))
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantHttpIndex {
    async fn ensure_collection(&self, dimension: usize) -> Result<(), StoreError> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/collections/{}", self.collection),
            )
            .send()
            .await
            .map_err(StoreError::backend)?;

        if resp.status().is_success() {
            return Ok(());
        }
        if resp.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Backend(format!(
                "collection probe failed: {}",
                resp.status()
            )));
        }

        let body = json!({
            "vectors": { "size": dimension, "distance": "Cosine" }
        });
        let resp = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{}", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(StoreError::backend)?;
        Self::expect_success(resp, "collection create").await?;
        Ok(())
    }

    async fn upsert_point(
        &self,
        fact_id: &str,
        vector: &[f32],
        payload: &Fact,
    ) -> Result<(), StoreError> {
        let body = json!({
            "points": [{
                "id": fact_id,
                "vector": vector,
                "payload": payload,
            }]
        });
        let resp = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{}/points?wait=true", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(StoreError::backend)?;
        Self::expect_success(resp, "point upsert").await?;
        Ok(())
    }

    async fn query_nearest(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPoint>, StoreError> {
        let body = json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{}/points/search", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(StoreError::backend)?;
        let resp = Self::expect_success(resp, "search").await?;

        let data: serde_json::Value = resp.json().await.map_err(StoreError::backend)?;
        let hits = data
            .get("result")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();

        let mut points = Vec::with_capacity(hits.len());
        for hit in hits {
            let score = hit.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0) as f32;
            let payload = match hit.get("payload") {
                Some(value) if !value.is_null() => {
                    match serde_json::from_value::<Fact>(value.clone()) {
                        Ok(fact) => Some(fact),
                        Err(e) => {
                            warn!("Discarding undecodable index payload: {}", e);
                            None
                        }
                    }
                }
                _ => None,
            };
            points.push(ScoredPoint { payload, score });
        }
        Ok(points)
    }

    async fn delete_where(&self, field: &str, value: &str) -> Result<(), StoreError> {
        let body = json!({
            "filter": {
                "must": [{ "key": field, "match": { "value": value } }]
            }
        });
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{}/points/delete?wait=true", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(StoreError::backend)?;
        Self::expect_success(resp, "point delete").await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let resp = self
            .request(
                reqwest::Method::GET,
                &format!("/collections/{}", self.collection),
            )
            .send()
            .await
            .map_err(StoreError::backend)?;
        let resp = Self::expect_success(resp, "collection info").await?;
        let data: serde_json::Value = resp.json().await.map_err(StoreError::backend)?;
        Ok(data
            .pointer("/result/points_count")
            .and_then(|v| v.as_u64())
            .unwrap_or(0))
    }
}
