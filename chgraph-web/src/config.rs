//! Server configuration, layered from a TOML file and `CHGRAPH_*` variables.

use chgraph_scanner::COMPANIES_HOUSE_ORIGIN;
use chgraph_scanner::fetcher::DEFAULT_TIMEOUT_SECS;
use chgraph_scanner::page::DEFAULT_MAX_LISTED;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/chgraph/config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin requests are sent to in place of Companies House.
    pub upstream: String,
    pub timeout_secs: u64,
    pub max_listed: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upstream: COMPANIES_HOUSE_ORIGIN.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_listed: DEFAULT_MAX_LISTED,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read `path` if it exists, then overlay `CHGRAPH_*` environment variables.
/// Keys missing from both take their defaults.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("CHGRAPH").try_parsing(true))
        .build()?
        .try_deserialize()
}
