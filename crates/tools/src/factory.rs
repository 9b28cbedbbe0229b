//! Build collaborators from settings

use std::sync::Arc;

use doorman_config::{DirectoryBackend, NotificationBackend, Settings};
use doorman_core::{DirectoryError, NotificationError, NotificationSink, ResidentDirectory};

use crate::{
    HttpResidentDirectory, LogNotificationSink, StaticResidentDirectory, WebhookNotificationSink,
};

/// Resident directory for the configured backend
///
/// Returns `None` when resident validation is disabled.
pub fn build_directory(
    settings: &Settings,
) -> Result<Option<Arc<dyn ResidentDirectory>>, DirectoryError> {
    if !settings.intake.validation_enabled {
        return Ok(None);
    }

    let config = &settings.directory;
    let directory: Arc<dyn ResidentDirectory> = match config.backend {
        DirectoryBackend::Static => {
            let directory = StaticResidentDirectory::from_entries(&config.residents);
            tracing::info!(residents = directory.len(), "Using static resident directory");
            Arc::new(directory)
        }
        DirectoryBackend::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                DirectoryError::Unavailable("directory.endpoint is not configured".to_string())
            })?;
            tracing::info!(endpoint = %endpoint, "Using HTTP resident directory");
            Arc::new(HttpResidentDirectory::new(endpoint, config.timeout_ms)?)
        }
    };

    Ok(Some(directory))
}

/// Notification sink for the configured backend
pub fn build_notification_sink(
    settings: &Settings,
) -> Result<Arc<dyn NotificationSink>, NotificationError> {
    let config = &settings.notification;
    match config.backend {
        NotificationBackend::Log => {
            tracing::info!("Visit notifications will be logged only");
            Ok(Arc::new(LogNotificationSink::new(config.clone())))
        }
        NotificationBackend::Webhook => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                NotificationError::Delivery("notification.endpoint is not configured".to_string())
            })?;
            tracing::info!(endpoint = %endpoint, to = %config.to, "Using webhook notifications");
            Ok(Arc::new(WebhookNotificationSink::new(endpoint, config.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorman_config::ResidentEntry;

    #[tokio::test]
    async fn test_build_static_directory() {
        let mut settings = Settings::default();
        settings.directory.residents.push(ResidentEntry {
            apartment: "12B".to_string(),
            name: "Alice".to_string(),
        });

        let directory = build_directory(&settings).unwrap().unwrap();
        assert_eq!(directory.name(), "static");
        assert!(directory.lookup("12B", "Alice").await.unwrap().exists);
    }

    #[test]
    fn test_no_directory_without_validation() {
        let mut settings = Settings::default();
        settings.intake.validation_enabled = false;
        assert!(build_directory(&settings).unwrap().is_none());
    }

    #[test]
    fn test_http_directory_requires_endpoint() {
        let mut settings = Settings::default();
        settings.directory.backend = DirectoryBackend::Http;
        assert!(build_directory(&settings).is_err());

        settings.directory.endpoint = Some("http://directory.local/residents".to_string());
        let directory = build_directory(&settings).unwrap().unwrap();
        assert_eq!(directory.name(), "http");
    }

    #[test]
    fn test_build_notification_sinks() {
        let mut settings = Settings::default();
        assert_eq!(build_notification_sink(&settings).unwrap().name(), "log");

        settings.notification.backend = NotificationBackend::Webhook;
        assert!(build_notification_sink(&settings).is_err());

        settings.notification.endpoint = Some("http://mail.local/send".to_string());
        assert_eq!(build_notification_sink(&settings).unwrap().name(), "webhook");
    }
}
