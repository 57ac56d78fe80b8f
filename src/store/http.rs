//! HTTP backend for a Keep-compatible note API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::backend::{Backend, BackendError};
use crate::model::Note;

#[derive(Debug, Deserialize)]
struct NotesResponse {
    notes: Vec<Note>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// JSON-over-HTTP backend with bearer token authentication.
///
/// Token acquisition and refresh happen outside this process; the backend
/// only attaches whatever token it was constructed with.
pub struct HttpBackend {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a backend for the given API root, e.g. `https://keep.example/api/v1`
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 {
            return Err(BackendError::Unauthorized);
        }
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .map(|detail| detail.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError> {
        let url = format!("{}/notes", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .timeout(self.timeout)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: NotesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        tracing::debug!(count = body.notes.len(), "fetched notes from backend");
        Ok(body.notes)
    }

    async fn push_notes(&self, notes: &[Note]) -> Result<(), BackendError> {
        if notes.is_empty() {
            return Ok(());
        }
        let url = format!("{}/notes/sync", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&json!({ "notes": notes }))
            .send()
            .await?;
        Self::check_status(response).await?;
        tracing::debug!(count = notes.len(), "pushed notes to backend");
        Ok(())
    }
}
