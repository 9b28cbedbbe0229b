//! Resident directory lookup

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory answer for an apartment/resident pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentLookup {
    pub exists: bool,
}

impl ResidentLookup {
    pub fn found() -> Self {
        Self { exists: true }
    }

    pub fn not_found() -> Self {
        Self { exists: false }
    }
}

/// Directory lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error("Directory lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid directory response: {0}")]
    InvalidResponse(String),
}

/// Resident directory
///
/// A single attempt per call; the caller decides whether to retry.
#[async_trait]
pub trait ResidentDirectory: Send + Sync {
    /// Check whether `resident_name` lives at `apartment_number`
    async fn lookup(
        &self,
        apartment_number: &str,
        resident_name: &str,
    ) -> Result<ResidentLookup, DirectoryError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
