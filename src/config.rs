use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::models::SourceId;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Maximum non-empty raw items consumed per channel.
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    /// Maximum formatted records shown per query.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    /// Politeness pause between consecutive channel searches.
    #[serde(default = "default_source_pause_ms")]
    pub source_pause_ms: u64,
    /// Backoff used when a rate-limit signal carries no interval.
    #[serde(default = "default_rate_limit_fallback_secs")]
    pub rate_limit_fallback_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            per_source_limit: default_per_source_limit(),
            display_limit: default_display_limit(),
            source_pause_ms: default_source_pause_ms(),
            rate_limit_fallback_secs: default_rate_limit_fallback_secs(),
        }
    }
}

fn default_per_source_limit() -> usize {
    20
}
fn default_display_limit() -> usize {
    10
}
fn default_source_pause_ms() -> u64 {
    1000
}
fn default_rate_limit_fallback_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    /// Ordered list of channel ids to gate and search. The order is the
    /// order the gate reports denials in and the order results appear in.
    /// An empty list is a valid configuration: the gate trivially passes
    /// and every query reports no results.
    #[serde(default)]
    pub channels: Vec<SourceId>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate gateway
    if config.gateway.base_url.trim().is_empty() {
        anyhow::bail!("gateway.base_url must not be empty");
    }
    if config.gateway.timeout_secs == 0 {
        anyhow::bail!("gateway.timeout_secs must be > 0");
    }

    // Validate pipeline
    if config.pipeline.per_source_limit < 1 {
        anyhow::bail!("pipeline.per_source_limit must be >= 1");
    }
    if config.pipeline.display_limit < 1 {
        anyhow::bail!("pipeline.display_limit must be >= 1");
    }

    Ok(config)
}
