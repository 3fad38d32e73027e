use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;

pub const DEFAULT_ROOT_SERVER: &str = "198.41.0.4:53";
const DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Where every resolution starts: `IP` or `IP:PORT`.
    #[serde(default = "default_root_server")]
    pub root_server: String,

    /// Transport calls allowed per top-level resolution, nested lookups included.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Overall deadline per resolution; 0 disables it.
    #[serde(default = "default_resolution_timeout_secs")]
    pub resolution_timeout_secs: u64,
}

impl ResolverConfig {
    pub fn root_server_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_server_addr(&self.root_server)
    }

    pub fn resolution_timeout(&self) -> Option<Duration> {
        (self.resolution_timeout_secs > 0).then(|| Duration::from_secs(self.resolution_timeout_secs))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            max_hops: default_max_hops(),
            max_nesting_depth: default_max_nesting_depth(),
            resolution_timeout_secs: default_resolution_timeout_secs(),
        }
    }
}

/// Parses `IP:PORT`, or a bare IP that gets port 53.
pub fn parse_server_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }
    value
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| ConfigError::Validation(format!("Invalid server address '{}'", value)))
}

fn default_root_server() -> String {
    DEFAULT_ROOT_SERVER.to_string()
}

fn default_max_hops() -> usize {
    32
}

fn default_max_nesting_depth() -> usize {
    4
}

fn default_resolution_timeout_secs() -> u64 {
    30
}
