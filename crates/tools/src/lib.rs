//! Integrations for the doorman intake agent
//!
//! Implements the collaborator traits from `doorman-core`:
//! - Resident directories (static list, remote HTTP service)
//! - Notification sinks (log stub, email gateway webhook)

pub mod directory;
pub mod factory;
pub mod notification;

pub use directory::{HttpResidentDirectory, StaticResidentDirectory};
pub use factory::{build_directory, build_notification_sink};
pub use notification::{LogNotificationSink, VisitNotification, WebhookNotificationSink};
