//! Intake session
//!
//! Wraps a controller behind an async mutex so intents for one session are
//! handled one at a time. A correction that arrives while a directory
//! lookup is outstanding waits for the lookup to finish.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use doorman_core::{
    IntakeState, Intent, NotificationSink, ResidentDirectory, Result, ToolCall,
};

use crate::controller::{IntakeController, IntakeSnapshot};

/// Response to one conversational turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Text for the voice layer to speak
    pub response: String,
    /// State after the turn
    pub state: IntakeState,
}

impl TurnOutcome {
    /// True once the conversation has nothing left to collect
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}

/// One visitor conversation
pub struct IntakeSession {
    id: String,
    created_at: DateTime<Utc>,
    controller: Mutex<IntakeController>,
}

impl IntakeSession {
    pub fn new(
        id: impl Into<String>,
        directory: Option<Arc<dyn ResidentDirectory>>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let id = id.into();
        let controller =
            IntakeController::new(id.clone(), notifier).with_optional_directory(directory);
        Self::from_controller(controller)
    }

    pub fn from_controller(controller: IntakeController) -> Self {
        Self {
            id: controller.session_id().to_string(),
            created_at: Utc::now(),
            controller: Mutex::new(controller),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Handle one intent
    pub async fn handle(&self, intent: Intent) -> Result<TurnOutcome> {
        let mut controller = self.controller.lock().await;
        let response = controller.dispatch(intent).await?;
        Ok(TurnOutcome {
            response,
            state: controller.state(),
        })
    }

    /// Handle one tool call from the language model
    pub async fn handle_tool_call(&self, call: &ToolCall) -> Result<TurnOutcome> {
        let mut controller = self.controller.lock().await;
        let response = controller.handle_tool_call(call).await?;
        Ok(TurnOutcome {
            response,
            state: controller.state(),
        })
    }

    pub async fn state(&self) -> IntakeState {
        self.controller.lock().await.state()
    }

    pub async fn validation_enabled(&self) -> bool {
        self.controller.lock().await.validation_enabled()
    }

    pub async fn snapshot(&self) -> IntakeSnapshot {
        self.controller.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doorman_core::{DirectoryError, NotificationError, ResidentLookup};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct NullSink;

    #[async_trait]
    impl NotificationSink for NullSink {
        async fn notify(&self, _summary: &str) -> std::result::Result<(), NotificationError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    /// Sink that counts calls and never finishes delivering
    #[derive(Default)]
    struct StalledSink {
        calls: AtomicUsize,
        entered: Notify,
    }

    #[async_trait]
    impl NotificationSink for StalledSink {
        async fn notify(&self, _summary: &str) -> std::result::Result<(), NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    /// Directory whose lookup blocks until released
    struct GatedDirectory {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ResidentDirectory for GatedDirectory {
        async fn lookup(
            &self,
            _apartment_number: &str,
            _resident_name: &str,
        ) -> std::result::Result<ResidentLookup, DirectoryError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(ResidentLookup::found())
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_turn_outcome() {
        let session = IntakeSession::new("s1", None, Arc::new(NullSink));
        assert_eq!(session.id(), "s1");
        assert!(!session.validation_enabled().await);

        let outcome = session
            .handle(Intent::SetApartment {
                apartment: "12B".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(outcome.state, IntakeState::Collecting);
        assert!(!outcome.is_finished());
    }

    #[tokio::test]
    async fn test_correction_waits_for_outstanding_lookup() {
        let directory = Arc::new(GatedDirectory {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let session = Arc::new(IntakeSession::new(
            "s2",
            Some(directory.clone()),
            Arc::new(NullSink),
        ));

        session
            .handle(Intent::SetApartment {
                apartment: "12B".to_string(),
            })
            .await
            .unwrap();
        session
            .handle(Intent::SetResident {
                name: "Alice".to_string(),
            })
            .await
            .unwrap();

        let checking = {
            let session = session.clone();
            tokio::spawn(async move { session.handle(Intent::CheckResident).await })
        };
        directory.entered.notified().await;

        let correcting = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .handle(Intent::SetApartment {
                        apartment: "12C".to_string(),
                    })
                    .await
            })
        };

        // The correction can't run while the lookup holds the session
        tokio::task::yield_now().await;
        assert!(!correcting.is_finished());

        directory.release.notify_one();
        let checked = checking.await.unwrap().unwrap();
        assert_eq!(checked.state, IntakeState::Collecting);

        correcting.await.unwrap().unwrap();
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.summary.apartment_number, "12C");
        // The correction came after the check, so it must be redone
        assert_eq!(
            snapshot.record.resident_validation(),
            doorman_core::ResidentValidation::Unknown
        );
    }

    #[tokio::test]
    async fn test_abandoned_confirm_does_not_notify_again() {
        let sink = Arc::new(StalledSink::default());
        let session = Arc::new(IntakeSession::new("s3", None, sink.clone()));

        let fields = [
            Intent::SetApartment {
                apartment: "12B".to_string(),
            },
            Intent::SetResident {
                name: "Alice".to_string(),
            },
            Intent::SetVisitor {
                name: "Bob".to_string(),
            },
            Intent::SetReason {
                reason: "delivery".to_string(),
            },
        ];
        for intent in fields {
            session.handle(intent).await.unwrap();
        }

        let confirming = {
            let session = session.clone();
            tokio::spawn(async move { session.handle(Intent::Confirm).await })
        };
        sink.entered.notified().await;
        confirming.abort();
        assert!(confirming.await.unwrap_err().is_cancelled());

        assert_eq!(session.state().await, IntakeState::Confirmed);
        let replay = session.handle(Intent::Confirm).await.unwrap();
        assert_eq!(replay.state, IntakeState::Confirmed);
        assert!(replay.response.contains("visitor_name: Bob"));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }
}
