use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::{parse_server_addr, ResolverConfig};
use super::server::ServerConfig;
use super::transport::TransportConfig;

const LOCAL_CONFIG: &str = "ferrous-lookup.toml";
const SYSTEM_CONFIG: &str = "/etc/ferrous-lookup/config.toml";

/// Main configuration structure for Ferrous Lookup
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// UDP listener used by `lookup serve`
    #[serde(default)]
    pub server: ServerConfig,

    /// Delegation walk bounds and the root server
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Per-exchange retry policy
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-lookup.toml in current directory
    /// 3. /etc/ferrous-lookup/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(root) = overrides.root_server {
            self.resolver.root_server = root;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if self.server.write_attempts == 0 {
            return Err(ConfigError::Validation(
                "server.write_attempts must be at least 1".to_string(),
            ));
        }
        if self.transport.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "transport.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.transport.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "transport.attempt_timeout_ms must be positive".to_string(),
            ));
        }
        if self.resolver.max_hops == 0 {
            return Err(ConfigError::Validation(
                "resolver.max_hops must be at least 1".to_string(),
            ));
        }
        parse_server_addr(&self.resolver.root_server)?;
        Ok(())
    }

    /// Get the path to the configuration file that `load` would pick up
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|candidate| std::path::Path::new(candidate).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub root_server: Option<String>,
    pub log_level: Option<String>,
}
