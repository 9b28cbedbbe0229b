//! Core types and traits for the doorman intake agent
//!
//! This crate provides the types shared by the other crates:
//! - Visitor record and summary rendering
//! - Intake lifecycle states
//! - Intents and tool-call decoding
//! - Collaborator traits (resident directory, notification sink)
//! - Error types

pub mod error;
pub mod intake;
pub mod intent;
pub mod llm_types;
pub mod traits;
pub mod visitor;

pub use error::{Error, Result};
pub use intake::IntakeState;
pub use intent::{tool_names, Intent};
pub use llm_types::{ToolCall, ToolDefinition};
pub use traits::{
    DirectoryError, NotificationError, NotificationSink, ResidentDirectory, ResidentLookup,
};
pub use visitor::{
    ResidentValidation, VisitSummary, VisitorField, VisitorRecord, UNKNOWN_PLACEHOLDER,
};
