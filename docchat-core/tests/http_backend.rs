//! Integration tests for the HTTP backend against a local stub service.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use docchat_core::config::ApiConfig;
use docchat_core::{
    BackendError, ChatWorkspace, HttpRagBackend, QueryRequest, RagBackend, SelectedFile,
    UploadRequest,
};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy)]
enum Mode {
    Ok,
    Reject,
    EmptyError,
}

struct Stub {
    mode: Mode,
    upload_bodies: Mutex<Vec<(String, Vec<u8>)>>,
    queries: Mutex<Vec<serde_json::Value>>,
}

type Shared = Arc<Stub>;

async fn upload(State(stub): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.upload_bodies
        .lock()
        .unwrap()
        .push((content_type, body.to_vec()));
    match stub.mode {
        Mode::Ok => axum::Json(serde_json::json!({
            "session_id": "server-session",
            "documents": [{
                "document_id": "d1",
                "filename": "report.pdf",
                "content_type": "application/pdf",
                "stored_path": "/uploads/report.pdf",
                "chunk_count": 5
            }]
        }))
        .into_response(),
        Mode::Reject => (
            StatusCode::BAD_REQUEST,
            "You can upload a maximum of two documents per request.",
        )
            .into_response(),
        Mode::EmptyError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn query(State(stub): State<Shared>, axum::Json(body): axum::Json<serde_json::Value>) -> Response {
    stub.queries.lock().unwrap().push(body);
    match stub.mode {
        Mode::Ok => axum::Json(serde_json::json!({
            "answer": "  Paris  ",
            "citations": [{
                "document_id": "d1",
                "source": "report.pdf",
                "chunk_index": 0,
                "text_snippet": "Paris is the capital"
            }]
        }))
        .into_response(),
        Mode::Reject => (StatusCode::UNPROCESSABLE_ENTITY, "question too short").into_response(),
        Mode::EmptyError => StatusCode::BAD_GATEWAY.into_response(),
    }
}

async fn spawn_stub(mode: Mode) -> (String, Shared) {
    let stub = Arc::new(Stub {
        mode,
        upload_bodies: Mutex::new(Vec::new()),
        queries: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/document/upload", post(upload))
        .route("/chat/query", post(query))
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), stub)
}

fn backend(base_url: &str) -> HttpRagBackend {
    HttpRagBackend::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 10,
    })
    .unwrap()
}

fn staged_file(dir: &std::path::Path, name: &str, contents: &[u8]) -> SelectedFile {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    SelectedFile::from_path(&path).unwrap()
}

#[tokio::test]
async fn test_upload_sends_multipart_with_session() {
    let (base, stub) = spawn_stub(Mode::Ok).await;
    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path(), "report.pdf", b"%PDF-1.4 fake");

    let response = backend(&base)
        .upload(UploadRequest {
            files: vec![file],
            session_id: Some("client-session".into()),
        })
        .await
        .unwrap();
    assert_eq!(response.session_id, "server-session");
    assert_eq!(response.documents[0].chunk_count, 5);

    let bodies = stub.upload_bodies.lock().unwrap();
    let (content_type, body) = &bodies[0];
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(body);
    assert!(body.contains("name=\"files\"; filename=\"report.pdf\""));
    assert!(body.contains("application/pdf"));
    assert!(body.contains("%PDF-1.4 fake"));
    assert!(body.contains("name=\"session_id\""));
    assert!(body.contains("client-session"));
}

#[tokio::test]
async fn test_upload_without_session_omits_field() {
    let (base, stub) = spawn_stub(Mode::Ok).await;
    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path(), "notes.txt", b"hello");

    backend(&base)
        .upload(UploadRequest {
            files: vec![file],
            session_id: None,
        })
        .await
        .unwrap();
    let bodies = stub.upload_bodies.lock().unwrap();
    assert!(!String::from_utf8_lossy(&bodies[0].1).contains("session_id"));
}

#[tokio::test]
async fn test_upload_rejection_carries_body_text() {
    let (base, _stub) = spawn_stub(Mode::Reject).await;
    let dir = tempfile::tempdir().unwrap();
    let file = staged_file(dir.path(), "a.txt", b"a");

    let err = backend(&base)
        .upload(UploadRequest {
            files: vec![file],
            session_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 400,
            body: "You can upload a maximum of two documents per request.".into(),
        }
    );
}

#[tokio::test]
async fn test_query_posts_json_with_null_filter() {
    let (base, stub) = spawn_stub(Mode::Ok).await;
    let response = backend(&base)
        .query(QueryRequest {
            question: "Capital?".into(),
            session_id: "s1".into(),
            document_ids: None,
        })
        .await
        .unwrap();
    assert_eq!(response.answer.as_deref(), Some("  Paris  "));
    assert_eq!(response.citations.len(), 1);

    let queries = stub.queries.lock().unwrap();
    assert_eq!(queries[0]["question"], "Capital?");
    assert_eq!(queries[0]["session_id"], "s1");
    assert!(queries[0]["document_ids"].is_null());
}

#[tokio::test]
async fn test_query_empty_error_body() {
    let (base, _stub) = spawn_stub(Mode::EmptyError).await;
    let err = backend(&base)
        .query(QueryRequest {
            question: "q".into(),
            session_id: "s1".into(),
            document_ids: Some(vec!["d1".into()]),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 502,
            body: String::new(),
        }
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}"))
        .query(QueryRequest {
            question: "q".into(),
            session_id: "s1".into(),
            document_ids: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Transport { .. }));
}

#[tokio::test]
async fn test_workspace_end_to_end_over_http() {
    let (base, stub) = spawn_stub(Mode::Ok).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let mut ws = ChatWorkspace::new(Arc::new(backend(&base)));
    ws.stage_paths(&[&path]).unwrap();
    ws.submit_upload().await.unwrap();
    assert_eq!(ws.state().session_id, "server-session");
    assert_eq!(ws.state().document_filter, "d1");

    ws.submit_question("Capital?").await.unwrap();
    let transcript = &ws.state().transcript;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].content, "Paris");
    assert_eq!(transcript[1].citations[0].source, "report.pdf");

    let queries = stub.queries.lock().unwrap();
    assert_eq!(queries[0]["session_id"], "server-session");
    assert_eq!(queries[0]["document_ids"], serde_json::json!(["d1"]));
}

#[tokio::test]
async fn test_workspace_surfaces_rejection_inline() {
    let (base, _stub) = spawn_stub(Mode::Reject).await;
    let mut ws = ChatWorkspace::new(Arc::new(backend(&base)));
    ws.set_session_id("s1");
    ws.submit_question("q").await.unwrap();
    assert_eq!(ws.state().chat_error.as_deref(), Some("question too short"));
    assert_eq!(ws.state().transcript.len(), 1);
}
