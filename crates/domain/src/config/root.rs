use serde::{Deserialize, Serialize};

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::servers::ServerEntry;
use super::worker::WorkerConfig;
use crate::lookup::LookupTarget;

const LOCAL_CONFIG: &str = "ferrous-probe.toml";
const SYSTEM_CONFIG: &str = "/etc/ferrous-probe/config.toml";

/// Main configuration structure for Ferrous Probe
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// HTTP job API binding
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default targets used when a request names none
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-probe.toml in current directory
    /// 3. /etc/ferrous-probe/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.dns.timeout_secs = timeout;
        }
        if let Some(retries) = overrides.max_retries {
            self.dns.max_retries = retries;
        }
        if let Some(limit) = overrides.max_concurrent_queries {
            self.dns.max_concurrent_queries = limit;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Server port cannot be 0".to_string()));
        }
        if self.dns.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "dns.timeout_secs must be positive".to_string(),
            ));
        }
        if self.dns.max_retries == 0 {
            return Err(ConfigError::Validation(
                "dns.max_retries must be positive".to_string(),
            ));
        }
        if self.dns.max_concurrent_queries == 0 || self.dns.max_servers_per_request == 0 {
            return Err(ConfigError::Validation(
                "dns concurrency limits must be positive".to_string(),
            ));
        }
        if self.worker.cleanup_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "worker.cleanup_interval_secs must be positive".to_string(),
            ));
        }

        for (i, server) in self.servers.iter().enumerate() {
            server.validate().map_err(|e| {
                ConfigError::Validation(format!("server {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Every configured server expanded into its per-service targets.
    pub fn lookup_targets(&self) -> Vec<LookupTarget> {
        self.servers.iter().flat_map(ServerEntry::targets).collect()
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG, SYSTEM_CONFIG]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub max_concurrent_queries: Option<usize>,
    pub log_level: Option<String>,
}
