use serde::Deserialize;

use crate::infrastructure::admission::RateLimitConfig;
use crate::infrastructure::auth::TokenConfig;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub token: TokenConfig,
    pub keys: KeysConfig,
    pub rate_limit: RateLimitConfig,
    pub audit: AuditConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Persistence settings. `url = "memory"` keeps everything in process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.eq_ignore_ascii_case("memory")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub modulus_bits: usize,
    /// Insert one valid (+1h) and one expired (-1h) key at startup
    pub bootstrap: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://totally_not_my_privateKeys.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            modulus_bits: 2048,
            bootstrap: true,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.token.issuer, "jwks-server");
        assert_eq!(config.token.ttl_seconds, 3600);
        assert_eq!(config.keys.modulus_bits, 2048);
        assert!(config.keys.bootstrap);
        assert_eq!(config.rate_limit.burst, 10);
        assert!(!config.database.is_memory());
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"{"server": {"port": 9090}, "database": {"url": "memory"}, "logging": {"format": "json"}}"#,
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.database.is_memory());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.token.ttl_seconds, 3600);
    }
}
