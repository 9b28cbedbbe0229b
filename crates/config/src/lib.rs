//! Configuration management for the doorman intake agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (`DOORMAN__` prefix, `__` separator)

pub mod intake;
pub mod settings;

pub use intake::{IntakeConfig, DEFAULT_GREETING, DEFAULT_INSTRUCTIONS};
pub use settings::{
    load_settings, load_settings_from, DirectoryBackend, DirectoryConfig, NotificationBackend,
    NotificationConfig, ObservabilityConfig, ResidentEntry, RuntimeEnvironment, ServerConfig,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
