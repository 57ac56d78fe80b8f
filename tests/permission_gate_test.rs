//! Permission gate and failure containment tests

use keep_mcp::model::{Note, SENTINEL_LABEL};
use keep_mcp::store::MemoryBackend;
use keep_mcp::{KeepClient, KeepError, MutationGuard};

fn foreign_note() -> Note {
    // A note that exists in the account but was not created by this server
    Note::new_text("Theirs", "do not touch")
}

#[tokio::test]
async fn update_of_foreign_note_is_denied() {
    let note = foreign_note();
    let note_id = note.id.clone();
    let backend = MemoryBackend::with_notes(vec![note]);
    let mut client = KeepClient::new(backend, MutationGuard::new(false));
    client.load().await.unwrap();

    let err = client
        .update_note(&note_id, Some("hijacked"), Some("gone"))
        .unwrap_err();
    assert!(matches!(err, KeepError::PermissionDenied(_)));

    // Stored title and text are unchanged
    let note = client.get(&note_id).unwrap();
    assert_eq!(note.title, "Theirs");
    assert_eq!(note.text(), Some("do not touch"));
    assert_eq!(client.dirty_count(), 0);
}

#[tokio::test]
async fn unsafe_mode_allows_foreign_note_update() {
    let note = foreign_note();
    let note_id = note.id.clone();
    let backend = MemoryBackend::with_notes(vec![note]);
    let mut client = KeepClient::new(backend, MutationGuard::new(true));
    client.load().await.unwrap();

    let note = client.update_note(&note_id, Some("hijacked"), None).unwrap();
    assert_eq!(note.title, "hijacked");
}

#[tokio::test]
async fn delete_of_foreign_note_is_denied() {
    let note = foreign_note();
    let note_id = note.id.clone();
    let backend = MemoryBackend::with_notes(vec![note]);
    let mut client = KeepClient::new(backend, MutationGuard::new(false));
    client.load().await.unwrap();

    let err = client.delete_note(&note_id).unwrap_err();
    assert!(matches!(err, KeepError::PermissionDenied(_)));
    assert!(!client.get(&note_id).unwrap().trashed);
}

#[tokio::test]
async fn server_created_notes_are_mutable_by_default() {
    let mut client = KeepClient::new(MemoryBackend::new(), MutationGuard::new(false));
    let note_id = client.create_note("Mine", "content").id.clone();
    assert!(client.get(&note_id).unwrap().has_label(SENTINEL_LABEL));

    client.update_note(&note_id, Some("renamed"), None).unwrap();
    client.delete_note(&note_id).unwrap();
    assert!(client.get(&note_id).unwrap().trashed);
}

#[tokio::test]
async fn backend_fault_is_reported_not_fatal() {
    let backend = MemoryBackend::new();
    backend.fail_pushes();
    let mut client = KeepClient::new(backend, MutationGuard::new(false));

    let note_id = client.create_note("Mine", "content").id.clone();
    let err = client.sync().await.unwrap_err();
    assert!(err.to_string().contains("simulated push failure"));

    // The wrapped error carries the BackendError kind tag
    let wrapped = KeepError::Backend(err);
    assert_eq!(wrapped.kind(), "BackendError");

    // Local state survives as the source of truth for the next operation
    assert_eq!(client.get(&note_id).unwrap().title, "Mine");
    assert_eq!(client.dirty_count(), 1);
}

#[tokio::test]
async fn successful_sync_persists_to_backend() {
    let backend = MemoryBackend::new();
    let mut client = KeepClient::new(backend, MutationGuard::new(false));
    let note_id = client.create_note("Mine", "content").id.clone();
    client.sync().await.unwrap();

    // A fresh load round-trips the note through the backend
    client.load().await.unwrap();
    let note = client.get(&note_id).unwrap();
    assert_eq!(note.title, "Mine");
    assert!(note.has_label(SENTINEL_LABEL));
}
