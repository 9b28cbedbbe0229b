//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ConfigError, IntakeConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - log notifications, static directory allowed
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Intake conversation configuration
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Resident directory backend
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Visit notification backend
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_directory()?;
        self.validate_notification()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Must allow at least one session".to_string(),
            });
        }
        if self.server.session_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_secs".to_string(),
                message: "Session timeout must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn validate_directory(&self) -> Result<(), ConfigError> {
        if !self.intake.validation_enabled {
            return Ok(());
        }
        match self.directory.backend {
            DirectoryBackend::Http => {
                if self.directory.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::MissingField("directory.endpoint".to_string()));
                }
            }
            DirectoryBackend::Static => {
                if self.environment.is_production() {
                    return Err(ConfigError::InvalidValue {
                        field: "directory.backend".to_string(),
                        message: "Static directory is not allowed in production".to_string(),
                    });
                }
                if self.directory.residents.is_empty() {
                    tracing::warn!(
                        "Static resident directory is empty; every resident check will be rejected"
                    );
                }
            }
        }
        if self.directory.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "directory.timeout_ms".to_string(),
                message: "Lookup timeout must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn validate_notification(&self) -> Result<(), ConfigError> {
        match self.notification.backend {
            NotificationBackend::Webhook => {
                if self.notification.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::MissingField(
                        "notification.endpoint".to_string(),
                    ));
                }
            }
            NotificationBackend::Log => {
                if self.environment.is_strict() {
                    tracing::warn!(
                        environment = ?self.environment,
                        "Notifications are only logged; no one will be notified of visits"
                    );
                }
            }
        }
        if self.notification.to.trim().is_empty() {
            return Err(ConfigError::MissingField("notification.to".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent intake sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time before a session is discarded
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// How often expired sessions are swept
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_sessions() -> usize {
    100
}
fn default_session_timeout() -> u64 {
    900
}
fn default_cleanup_interval() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Resident directory backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryBackend {
    /// Residents listed in configuration
    #[default]
    Static,
    /// Remote directory service
    Http,
}

/// A resident listed in the static directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentEntry {
    pub apartment: String,
    pub name: String,
}

/// Resident directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub backend: DirectoryBackend,

    /// Lookup URL for the http backend
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-lookup timeout
    #[serde(default = "default_directory_timeout")]
    pub timeout_ms: u64,

    /// Residents for the static backend
    #[serde(default)]
    pub residents: Vec<ResidentEntry>,
}

fn default_directory_timeout() -> u64 {
    3000
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            backend: DirectoryBackend::default(),
            endpoint: None,
            timeout_ms: default_directory_timeout(),
            residents: Vec::new(),
        }
    }
}

/// Notification backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
    /// Write notifications to the log only
    #[default]
    Log,
    /// POST notifications to an email gateway
    Webhook,
}

/// Visit notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub backend: NotificationBackend,

    /// Gateway URL for the webhook backend
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_from")]
    pub from: String,

    #[serde(default = "default_to")]
    pub to: String,

    /// Per-delivery timeout
    #[serde(default = "default_notification_timeout")]
    pub timeout_ms: u64,
}

fn default_subject() -> String {
    "Visitor Notification".to_string()
}
fn default_from() -> String {
    "doorman@building.local".to_string()
}
fn default_to() -> String {
    "admin@admin.admin".to_string()
}
fn default_notification_timeout() -> u64 {
    5000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: NotificationBackend::default(),
            endpoint: None,
            subject: default_subject(),
            from: default_from(),
            to: default_to(),
            timeout_ms: default_notification_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from `config/` in the working directory
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a specific configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("DOORMAN")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.intake.validation_enabled);
        assert_eq!(settings.directory.backend, DirectoryBackend::Static);
        assert_eq!(settings.notification.backend, NotificationBackend::Log);
        assert_eq!(settings.notification.subject, "Visitor Notification");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();
        settings.server.max_sessions = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_http_directory_requires_endpoint() {
        let mut settings = Settings::default();
        settings.directory.backend = DirectoryBackend::Http;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(field)) if field == "directory.endpoint"
        ));

        settings.directory.endpoint = Some("http://directory.local/residents".to_string());
        assert!(settings.validate().is_ok());

        // Directory settings are irrelevant without validation
        settings.directory.endpoint = None;
        settings.intake.validation_enabled = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_static_directory_rejected_in_production() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_webhook_requires_endpoint() {
        let mut settings = Settings::default();
        settings.notification.backend = NotificationBackend::Webhook;
        assert!(settings.validate().is_err());

        settings.notification.endpoint = Some("http://mail.local/send".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            r#"
server:
  port: 9000
intake:
  validation_enabled: true
directory:
  backend: static
  residents:
    - apartment: "12B"
      name: Alice
notification:
  to: concierge@building.local
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.yaml"),
            r#"
server:
  max_sessions: 5
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.max_sessions, 5);
        assert_eq!(
            settings.directory.residents,
            vec![ResidentEntry {
                apartment: "12B".to_string(),
                name: "Alice".to_string()
            }]
        );
        assert_eq!(settings.notification.to, "concierge@building.local");
        assert_eq!(settings.notification.from, "doorman@building.local");
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.intake.greeting, crate::DEFAULT_GREETING);
    }
}
