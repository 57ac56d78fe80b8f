//! Error types shared across the crate
//!
//! Every tool entry point converts these into structured MCP results;
//! nothing below the dispatch boundary swallows them.

use thiserror::Error;

use crate::store::BackendError;

/// Errors surfaced by note and list operations
#[derive(Debug, Error)]
pub enum KeepError {
    /// Note id did not resolve in the local cache
    #[error("note not found: {0}")]
    NoteNotFound(String),

    /// Item id did not resolve within the note
    #[error("item {item_id} not found in note {note_id}")]
    ItemNotFound { note_id: String, item_id: String },

    /// A list operation was attempted on a plain text note
    #[error("note {0} is not a list")]
    NotAList(String),

    /// A text update was attempted on a checklist note
    #[error("note {0} is a list and has no freeform text")]
    NotATextNote(String),

    /// Forward, self, or depth-violating parent reference at creation time
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Mutation of a note the server does not own, without UNSAFE_MODE
    #[error("note {0} cannot be modified (missing the server label and UNSAFE_MODE is not enabled)")]
    PermissionDenied(String),

    /// Failure surfaced by the backend sync layer
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl KeepError {
    /// Stable kind tag included in tool error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            KeepError::NoteNotFound(_) | KeepError::ItemNotFound { .. } => "NotFound",
            KeepError::NotAList(_) => "NotAList",
            KeepError::NotATextNote(_) => "NotATextNote",
            KeepError::InvalidHierarchy(_) => "InvalidHierarchy",
            KeepError::PermissionDenied(_) => "PermissionDenied",
            KeepError::Backend(_) => "BackendError",
        }
    }
}
