//! In-process backend for tests and offline use

use std::sync::Mutex;

use async_trait::async_trait;

use super::backend::{Backend, BackendError};
use crate::model::Note;

/// Backend holding notes in memory.
///
/// Can be primed with existing notes and told to fail the next push, which
/// is how sync-failure containment is exercised in tests.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    notes: Vec<Note>,
    fail_push: bool,
    push_count: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with notes
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            state: Mutex::new(State {
                notes,
                ..State::default()
            }),
        }
    }

    /// Make every subsequent push fail with a network error
    pub fn fail_pushes(&self) {
        self.state.lock().unwrap().fail_push = true;
    }

    /// Number of successful pushes so far
    pub fn push_count(&self) -> usize {
        self.state.lock().unwrap().push_count
    }

    /// Snapshot of the backend's stored notes
    pub fn stored_notes(&self) -> Vec<Note> {
        self.state.lock().unwrap().notes.clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError> {
        Ok(self.state.lock().unwrap().notes.clone())
    }

    async fn push_notes(&self, notes: &[Note]) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_push {
            return Err(BackendError::Network("simulated push failure".to_string()));
        }
        for pushed in notes {
            match state.notes.iter_mut().find(|n| n.id == pushed.id) {
                Some(existing) => *existing = pushed.clone(),
                None => state.notes.push(pushed.clone()),
            }
        }
        state.push_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_then_fetch() {
        let backend = MemoryBackend::new();
        let note = Note::new_text("t", "x");
        backend.push_notes(std::slice::from_ref(&note)).await.unwrap();

        let fetched = backend.fetch_notes().await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, note.id);
        assert_eq!(backend.push_count(), 1);
    }

    #[tokio::test]
    async fn test_push_updates_existing() {
        let mut note = Note::new_text("t", "x");
        let backend = MemoryBackend::with_notes(vec![note.clone()]);

        note.title = "changed".to_string();
        backend.push_notes(std::slice::from_ref(&note)).await.unwrap();

        let fetched = backend.fetch_notes().await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].title, "changed");
    }

    #[tokio::test]
    async fn test_fail_pushes() {
        let backend = MemoryBackend::new();
        backend.fail_pushes();
        let note = Note::new_text("t", "x");
        let err = backend.push_notes(&[note]).await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
        assert_eq!(backend.push_count(), 0);
    }
}
