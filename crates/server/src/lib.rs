//! Doorman Server
//!
//! HTTP endpoints for driving intake sessions from a conversational engine.

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::{Session, SessionManager};
pub use state::AppState;

use axum::http::StatusCode;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Max sessions reached ({0})")]
    Capacity(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Visit already confirmed")]
    Sealed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<doorman_core::Error> for ServerError {
    fn from(err: doorman_core::Error) -> Self {
        use doorman_core::Error;

        match err {
            Error::RecordSealed { .. } => ServerError::Sealed,
            Error::InvalidToolCall(_)
            | Error::MissingArgument { .. }
            | Error::UnknownField(_) => ServerError::InvalidRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Sealed => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorman_core::IntakeState;

    #[test]
    fn test_core_error_status() {
        let sealed: ServerError = doorman_core::Error::RecordSealed {
            state: IntakeState::Confirmed,
        }
        .into();
        assert_eq!(StatusCode::from(sealed), StatusCode::CONFLICT);

        let bad: ServerError = doorman_core::Error::InvalidToolCall("x".into()).into();
        assert_eq!(StatusCode::from(bad), StatusCode::BAD_REQUEST);

        let missing = ServerError::SessionNotFound("abc".into());
        assert_eq!(StatusCode::from(missing), StatusCode::NOT_FOUND);
    }
}
