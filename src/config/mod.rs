//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuditConfig, DatabaseConfig, KeysConfig, LogFormat, LoggingConfig, ServerConfig,
};
