//! Dashboard configuration

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration, read from `DASHBOARD_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Host label attached to structured log events
    #[serde(default = "default_host_name")]
    pub host_name: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port; falls back to `PORT`, then 3001
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from a separately served frontend
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Maximum concurrent per-container stats queries
    #[serde(default = "default_stats_concurrency")]
    pub stats_concurrency: usize,
}

fn default_host_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001)
}

fn default_enable_cors() -> bool {
    true
}

fn default_stats_concurrency() -> usize {
    dashboard_lib::inventory::DEFAULT_STATS_CONCURRENCY
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host_name: default_host_name(),
            bind_address: default_bind_address(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            stats_concurrency: default_stats_concurrency(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DASHBOARD").try_parsing(true))
            .build()
            .context("Failed to read dashboard configuration")?;

        config
            .try_deserialize()
            .context("Invalid dashboard configuration")
    }

    /// Socket address to listen on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(config.enable_cors);
        assert_eq!(config.stats_concurrency, 4);
    }

    #[test]
    fn test_bind_addr() {
        let config = DashboardConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: DashboardConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(config.enable_cors);
    }
}
