//! Collaborator traits for the intake controller
//!
//! ```text
//! ResidentDirectory:  (apartment, resident) -> exists?
//! NotificationSink:   rendered visit summary -> delivered
//! ```
//!
//! Both are async so implementations can reach remote systems; timeouts
//! and retries belong to the implementation, not the controller.

mod directory;
mod notification;

pub use directory::{DirectoryError, ResidentDirectory, ResidentLookup};
pub use notification::{NotificationError, NotificationSink};
