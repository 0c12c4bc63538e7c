use serde_json::json;

use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholar::client::{AskRequest, AssistantBackend, UploadFile};
use scholar::session::{Message, Role, SessionId};
use scholar::{ChatMode, ScholarError};

mod common;

/// History is decoded in the order the service sent it
#[tokio::test]
async fn test_fetch_history_preserves_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "session_200": [{"role": "user", "content": "second"}],
                "session_100": [
                    {"role": "user", "content": "first"},
                    {"role": "assistant", "content": "reply"}
                ]
            }"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::http_backend(&server.uri());
    let store = backend.fetch_history().await.unwrap();

    let ids: Vec<_> = store.iter().map(|s| s.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["session_200", "session_100"]);

    let messages = store.get(&SessionId::from("session_100")).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role(), Role::Assistant);
    assert_eq!(messages[1].content(), "reply");
}

#[tokio::test]
async fn test_fetch_history_empty_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let store = common::http_backend(&server.uri())
        .fetch_history()
        .await
        .unwrap();
    assert!(store.is_empty());
}

/// Endpoints are joined under a base path that has no trailing slash
#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::http_backend(&format!("{}/api", server.uri()));
    backend.fetch_history().await.unwrap();
}

#[tokio::test]
async fn test_ask_sends_question_session_and_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "question": "What is a monad?",
            "session_id": "session_1",
            "mode": "concept_breakdown"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "A monad is..." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::http_backend(&server.uri());
    let reply = backend
        .ask(&AskRequest {
            question: "What is a monad?".to_string(),
            session_id: SessionId::from("session_1"),
            mode: ChatMode::ConceptBreakdown,
        })
        .await
        .unwrap();

    assert_eq!(reply.answer.as_deref(), Some("A monad is..."));
    assert!(reply.error.is_none());
}

#[tokio::test]
async fn test_ask_application_error_is_a_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "rate limited" })),
        )
        .mount(&server)
        .await;

    let reply = common::http_backend(&server.uri())
        .ask(&AskRequest {
            question: "q".to_string(),
            session_id: SessionId::from("s"),
            mode: ChatMode::Exam,
        })
        .await
        .unwrap();

    assert!(reply.answer.is_none());
    assert_eq!(reply.error.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn test_ask_server_error_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = common::http_backend(&server.uri())
        .ask(&AskRequest {
            question: "q".to_string(),
            session_id: SessionId::from("s"),
            mode: ChatMode::Exam,
        })
        .await
        .unwrap_err();

    match err.downcast_ref::<ScholarError>() {
        Some(ScholarError::Transport(msg)) => assert!(msg.contains("500"), "{}", msg),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ask_connection_refused_is_transport_failure() {
    let backend = common::http_backend(&common::unused_local_url());
    let err = backend
        .ask(&AskRequest {
            question: "q".to_string(),
            session_id: SessionId::from("s"),
            mode: ChatMode::Exam,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScholarError>(),
        Some(ScholarError::Transport(_))
    ));
}

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"notes.pdf\""))
        .and(body_string_contains("Content-Type: application/pdf"))
        .and(body_string_contains("%PDF-1.4 graph theory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "notes.pdf",
            "analysis": "Covers BFS and DFS."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::http_backend(&server.uri());
    let reply = backend
        .upload(&UploadFile::new(
            "notes.pdf",
            b"%PDF-1.4 graph theory".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(reply.filename, "notes.pdf");
    assert_eq!(reply.analysis, "Covers BFS and DFS.");
}

#[tokio::test]
async fn test_upload_rejected_format_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(415))
        .mount(&server)
        .await;

    let result = common::http_backend(&server.uri())
        .upload(&UploadFile::new("slides.pptx", b"pk".to_vec()))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_history_messages_round_trip_through_transcript_types() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_1": [
                {"role": "user", "content": "Uploaded file: notes.pdf"},
                {"role": "assistant", "content": "# File Analysis: notes.pdf\n\nGraphs."}
            ]
        })))
        .mount(&server)
        .await;

    let store = common::http_backend(&server.uri())
        .fetch_history()
        .await
        .unwrap();
    assert_eq!(
        store.get(&SessionId::from("session_1")).unwrap(),
        &[
            Message::user("Uploaded file: notes.pdf"),
            Message::assistant("# File Analysis: notes.pdf\n\nGraphs."),
        ]
    );
}
