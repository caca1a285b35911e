//! Configuration for the facts pipeline.
//!
//! Loads settings from /etc/factsd/config.toml or uses defaults. Every field
//! has a serde default so partial config files stay valid across upgrades.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/factsd/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/factsd/config.toml";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    // Localhost only; fronting proxies terminate external traffic
    "127.0.0.1:7610".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "/var/lib/factsd/facts.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Vector index settings. The dimension must match what the embedding
/// service produces; a mismatch is a deployment error, not handled at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_index_url() -> String {
    "http://127.0.0.1:6333".to_string()
}

fn default_collection() -> String {
    "facts".to_string()
}

fn default_dimension() -> usize {
    1536
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            collection: default_collection(),
            dimension: default_dimension(),
            api_key: None,
        }
    }
}

/// Remote capability endpoints: embedding, reranking, generation, web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,

    #[serde(default = "default_reranker_url")]
    pub reranker_url: String,

    #[serde(default = "default_generation_url")]
    pub generation_url: String,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default)]
    pub search_api_key: Option<String>,

    /// Timeout applied to every capability call; on timeout the call is
    /// treated like any other capability failure.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_generation_max_tokens")]
    pub generation_max_tokens: u32,
}

fn default_embedding_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_reranker_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_generation_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_search_url() -> String {
    "https://google.serper.dev/search".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_generation_max_tokens() -> u32 {
    512
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            embedding_url: default_embedding_url(),
            reranker_url: default_reranker_url(),
            generation_url: default_generation_url(),
            search_url: default_search_url(),
            search_api_key: None,
            request_timeout_secs: default_request_timeout(),
            generation_max_tokens: default_generation_max_tokens(),
        }
    }
}

/// Lifecycle thresholds and windows.
///
/// `rerank_threshold` and `staging_window_secs` are recognized so operator
/// config files carrying them stay valid, but no formula consumes them yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Verification score at or above which a fact is promoted to production
    #[serde(default = "default_verify_high")]
    pub verify_high: f64,

    /// Verification score at or below which a fact is rejected
    #[serde(default = "default_verify_low")]
    pub verify_low: f64,

    #[serde(default = "default_rerank_threshold")]
    pub rerank_threshold: f64,

    /// Confirmations required before scoring promotes a staged fact
    #[serde(default = "default_staging_confirm_k")]
    pub staging_confirm_k: u32,

    #[serde(default = "default_staging_window_secs")]
    pub staging_window_secs: u64,

    /// Trust half-life for decay during pruning
    #[serde(default = "default_decay_half_life_secs")]
    pub decay_half_life_secs: u64,

    /// Decayed trust below this is pruned from both stores
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: f64,

    /// Candidates retrieved and facts kept at query time
    #[serde(default = "default_query_top_k")]
    pub query_top_k: usize,

    /// Web snippets requested per verification pass
    #[serde(default = "default_search_snippets")]
    pub search_snippets: usize,
}

fn default_verify_high() -> f64 {
    0.85
}

fn default_verify_low() -> f64 {
    0.55
}

fn default_rerank_threshold() -> f64 {
    0.7
}

fn default_staging_confirm_k() -> u32 {
    2
}

fn default_staging_window_secs() -> u64 {
    48 * 3600
}

fn default_decay_half_life_secs() -> u64 {
    30 * 24 * 3600
}

fn default_prune_threshold() -> f64 {
    0.15
}

fn default_query_top_k() -> usize {
    8
}

fn default_search_snippets() -> usize {
    6
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            verify_high: default_verify_high(),
            verify_low: default_verify_low(),
            rerank_threshold: default_rerank_threshold(),
            staging_confirm_k: default_staging_confirm_k(),
            staging_window_secs: default_staging_window_secs(),
            decay_half_life_secs: default_decay_half_life_secs(),
            prune_threshold: default_prune_threshold(),
            query_top_k: default_query_top_k(),
            search_snippets: default_search_snippets(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub capabilities: CapabilityConfig,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl Config {
    /// Load config from the standard paths, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from specific path
    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }
}
