//! HTTP backend tests against a mock server

use keep_mcp::model::Note;
use keep_mcp::store::{Backend, BackendError, HttpBackend};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_notes_parses_response() {
    let server = MockServer::start().await;
    let note = Note::new_text("Remote", "from the backend");
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(bearer_token("tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [serde_json::to_value(&note).unwrap()]
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), "tok");
    let notes = backend.fetch_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, note.id);
    assert_eq!(notes[0].text(), Some("from the backend"));
}

#[tokio::test]
async fn push_notes_sends_payload() {
    let server = MockServer::start().await;
    let note = Note::new_text("Local", "x");
    Mock::given(method("POST"))
        .and(path("/notes/sync"))
        .and(bearer_token("tok"))
        .and(body_partial_json(json!({
            "notes": [{"id": note.id, "title": "Local"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), "tok");
    backend.push_notes(std::slice::from_ref(&note)).await.unwrap();
}

#[tokio::test]
async fn push_with_no_changes_skips_the_network() {
    // No mock mounted: any request would 404 and fail the call
    let server = MockServer::start().await;
    let backend = HttpBackend::new(server.uri(), "tok");
    backend.push_notes(&[]).await.unwrap();
}

#[tokio::test]
async fn unauthorized_maps_to_token_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), "bad-token");
    let err = backend.fetch_notes().await.unwrap_err();
    assert!(matches!(err, BackendError::Unauthorized));
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "backend unavailable"}
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), "tok");
    let err = backend.fetch_notes().await.unwrap_err();
    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(server.uri(), "tok");
    let err = backend.fetch_notes().await.unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}
