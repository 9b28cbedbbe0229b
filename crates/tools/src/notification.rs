//! Visit notification sinks

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use doorman_config::NotificationConfig;
use doorman_core::{NotificationError, NotificationSink};

/// Email-shaped notification sent to the building admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitNotification {
    pub subject: String,
    pub from: String,
    pub to: String,
    /// Rendered visit summary
    pub body: String,
}

impl VisitNotification {
    pub fn from_config(config: &NotificationConfig, summary: &str) -> Self {
        Self {
            subject: config.subject.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
            body: summary.to_string(),
        }
    }
}

/// Stub sink that only logs notifications
///
/// For development; nobody is actually notified.
pub struct LogNotificationSink {
    config: NotificationConfig,
}

impl LogNotificationSink {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }
}

impl Default for LogNotificationSink {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, summary: &str) -> Result<(), NotificationError> {
        let notification = VisitNotification::from_config(&self.config, summary);
        tracing::info!(
            subject = %notification.subject,
            from = %notification.from,
            to = %notification.to,
            body = %notification.body,
            "Stub notification: visit summary"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Sink that POSTs notifications to an email gateway
pub struct WebhookNotificationSink {
    client: reqwest::Client,
    endpoint: String,
    config: NotificationConfig,
}

impl WebhookNotificationSink {
    pub fn new(
        endpoint: impl Into<String>,
        config: NotificationConfig,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NotificationError::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            config,
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookNotificationSink {
    async fn notify(&self, summary: &str) -> Result<(), NotificationError> {
        let notification = VisitNotification::from_config(&self.config, summary);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&notification)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout(self.config.timeout_ms)
                } else {
                    NotificationError::Delivery(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(
            endpoint = %self.endpoint,
            to = %notification.to,
            "Visit notification delivered"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_envelope() {
        let config = NotificationConfig::default();
        let notification = VisitNotification::from_config(&config, "apartment_number: 12B\n");
        assert_eq!(notification.subject, "Visitor Notification");
        assert_eq!(notification.from, "doorman@building.local");
        assert_eq!(notification.to, "admin@admin.admin");
        assert_eq!(notification.body, "apartment_number: 12B\n");

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["to"], "admin@admin.admin");
    }

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let sink = LogNotificationSink::default();
        assert!(sink.notify("visitor_name: Bob\n").await.is_ok());
        assert_eq!(sink.name(), "log");
    }

    #[tokio::test]
    async fn test_webhook_unreachable_fails() {
        let mut config = NotificationConfig::default();
        config.timeout_ms = 500;
        let sink = WebhookNotificationSink::new("http://127.0.0.1:9/send", config).unwrap();
        let err = sink.notify("visitor_name: Bob\n").await.unwrap_err();
        assert!(matches!(
            err,
            NotificationError::Delivery(_) | NotificationError::Timeout(_)
        ));
    }
}
