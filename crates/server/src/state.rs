//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use doorman_config::Settings;
use doorman_core::{NotificationSink, ResidentDirectory};

use crate::session::{Session, SessionManager};
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    /// Present iff resident validation is enabled
    pub directory: Option<Arc<dyn ResidentDirectory>>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppState {
    pub fn new(
        config: Settings,
        directory: Option<Arc<dyn ResidentDirectory>>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let sessions = SessionManager::with_config(
            config.server.max_sessions,
            Duration::from_secs(config.server.session_timeout_secs),
            Duration::from_secs(config.server.cleanup_interval_secs),
        );
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            directory,
            notifier,
        }
    }

    pub fn validation_enabled(&self) -> bool {
        self.directory.is_some()
    }

    /// Look up a live session
    pub fn session(&self, id: &str) -> Result<Arc<Session>, ServerError> {
        self.sessions
            .get(id)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }

    /// Create a session wired to the shared collaborators
    pub fn create_session(&self) -> Result<Arc<Session>, ServerError> {
        self.sessions
            .create(self.directory.clone(), self.notifier.clone())
    }
}
