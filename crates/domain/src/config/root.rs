use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;

const LOCAL_CONFIG: &str = "ferrous-query.toml";
const SYSTEM_CONFIG: &str = "/etc/ferrous-query/config.toml";

/// Main configuration structure for ferrous-query
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Name servers and retry policy
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-query.toml in current directory
    /// 3. /etc/ferrous-query/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if std::path::Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(servers) = overrides.servers {
            if !servers.is_empty() {
                self.resolver.servers = servers;
            }
        }
        if let Some(timeout) = overrides.timeout_ms {
            self.resolver.timeout_ms = timeout;
        }
        if let Some(retries) = overrides.retries {
            self.resolver.retries = retries;
        }
        if let Some(tcp_timeout) = overrides.tcp_timeout_ms {
            self.resolver.tcp_timeout_ms = Some(tcp_timeout);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No DNS servers configured".to_string(),
            ));
        }

        if self.resolver.retries == 0 {
            return Err(ConfigError::Validation(
                "retries must be at least 1".to_string(),
            ));
        }

        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "timeout_ms cannot be 0".to_string(),
            ));
        }

        for server in &self.resolver.servers {
            server
                .parse::<crate::ServerAddr>()
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub servers: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub tcp_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}
