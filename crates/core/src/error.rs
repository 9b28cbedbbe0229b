//! Error types for the doorman intake core

use thiserror::Error;

use crate::intake::IntakeState;
use crate::traits::{DirectoryError, NotificationError};

/// Core error type
///
/// Only contract violations surface here. Soft conversational outcomes
/// (missing information, directory unavailable, rejected visit) are spoken
/// responses, not errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Visitor record is sealed ({state}); no further changes are accepted")]
    RecordSealed { state: IntakeState },

    #[error("Visitor record is incomplete; missing {}", .0.join(", "))]
    IncompleteRecord(Vec<String>),

    #[error("Unknown visitor field: {0}")]
    UnknownField(String),

    #[error("Unknown tool: {0}")]
    InvalidToolCall(String),

    #[error("Missing argument '{argument}' for tool {tool}")]
    MissingArgument { tool: String, argument: String },

    #[error("Summary serialization error: {0}")]
    Serialization(String),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
