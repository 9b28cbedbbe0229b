//! Visit notification delivery

use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Delivery timed out after {0}ms")]
    Timeout(u64),

    #[error("Gateway rejected notification (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Write-only sink for confirmed visit summaries
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a rendered visit summary
    async fn notify(&self, summary: &str) -> Result<(), NotificationError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
