//! Backend sync boundary

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Note;

/// Errors surfaced by the backend sync layer
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(String),

    /// API error (4xx/5xx responses)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response parsing error
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid or expired credentials
    #[error("invalid API token")]
    Unauthorized,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Network(err.to_string())
    }
}

/// Persistence boundary for the local note cache.
///
/// Implementations either fully apply a push or fail it; the client never
/// retries and never rolls back local state on failure.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full set of notes visible to this account
    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError>;

    /// Persist locally changed notes
    async fn push_notes(&self, notes: &[Note]) -> Result<(), BackendError>;
}
