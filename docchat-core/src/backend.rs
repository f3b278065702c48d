//! RAG service backends.
//!
//! The `RagBackend` trait is the only seam to the remote service.
//! `HttpRagBackend` talks to it over HTTP with `reqwest`; `MockRagBackend`
//! replays queued responses and records requests for tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::BackendError;
use crate::types::{QueryRequest, QueryResponse, UploadResponse};
use crate::upload::UploadRequest;

/// Path of the upload endpoint, relative to the base URL.
pub const UPLOAD_PATH: &str = "document/upload";

/// Path of the query endpoint, relative to the base URL.
pub const QUERY_PATH: &str = "chat/query";

/// Trait for the remote document-indexing and question-answering service.
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Upload and index up to two documents.
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError>;

    /// Ask a question against previously indexed documents.
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, BackendError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// HTTP backend for the RAG service.
pub struct HttpRagBackend {
    client: reqwest::Client,
    api: ApiConfig,
}

impl HttpRagBackend {
    /// Create a backend from API configuration.
    pub fn new(api: &ApiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport {
                message: format!("HTTP client init failed: {e}"),
            })?;
        Ok(Self {
            client,
            api: api.clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    async fn build_form(request: &UploadRequest) -> Result<reqwest::multipart::Form, BackendError> {
        let mut form = reqwest::multipart::Form::new();
        for file in &request.files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|e| BackendError::Transport {
                    message: format!("Cannot read {}: {e}", file.path.display()),
                })?;
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| BackendError::Transport {
                    message: format!("MIME error: {e}"),
                })?;
            form = form.part("files", part);
        }
        if let Some(session_id) = &request.session_id {
            form = form.text("session_id", session_id.clone());
        }
        Ok(form)
    }

    /// Turn a non-2xx response into `BackendError::Status` with its body text.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Transport {
        message: format!("HTTP request failed: {err}"),
    }
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
        let url = self.api.endpoint(UPLOAD_PATH);
        debug!(%url, files = request.files.len(), "POST upload");
        let form = Self::build_form(&request).await?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| BackendError::ResponseParse {
                message: format!("JSON parse error: {e}"),
            })
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, BackendError> {
        let url = self.api.endpoint(QUERY_PATH);
        debug!(%url, "POST query");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| BackendError::ResponseParse {
                message: format!("JSON parse error: {e}"),
            })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// A mock backend for testing.
///
/// Responses are served in the order they were queued. When a queue is
/// empty the call fails with a transport error.
pub struct MockRagBackend {
    uploads: Mutex<Vec<Result<UploadResponse, BackendError>>>,
    queries: Mutex<Vec<Result<QueryResponse, BackendError>>>,
    upload_requests: Mutex<Vec<UploadRequest>>,
    query_requests: Mutex<Vec<QueryRequest>>,
    upload_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl MockRagBackend {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            upload_requests: Mutex::new(Vec::new()),
            query_requests: Mutex::new(Vec::new()),
            upload_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Queue the outcome of the next upload.
    pub fn push_upload(&self, result: Result<UploadResponse, BackendError>) {
        self.uploads.lock().unwrap().push(result);
    }

    /// Queue the outcome of the next query.
    pub fn push_query(&self, result: Result<QueryResponse, BackendError>) {
        self.queries.lock().unwrap().push(result);
    }

    /// Queue a successful answer.
    pub fn push_answer(&self, answer: impl Into<String>) {
        self.push_query(Ok(QueryResponse {
            answer: Some(answer.into()),
            citations: Vec::new(),
        }));
    }

    /// Number of times `upload` was called.
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::Relaxed)
    }

    /// Number of times `query` was called.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::Relaxed)
    }

    /// Requests received by `upload`, oldest first.
    pub fn upload_requests(&self) -> Vec<UploadRequest> {
        self.upload_requests.lock().unwrap().clone()
    }

    /// Requests received by `query`, oldest first.
    pub fn query_requests(&self) -> Vec<QueryRequest> {
        self.query_requests.lock().unwrap().clone()
    }
}

impl Default for MockRagBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RagBackend for MockRagBackend {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, BackendError> {
        self.upload_calls.fetch_add(1, Ordering::Relaxed);
        self.upload_requests.lock().unwrap().push(request);
        let mut queued = self.uploads.lock().unwrap();
        if queued.is_empty() {
            Err(BackendError::Transport {
                message: "no mock upload responses queued".into(),
            })
        } else {
            queued.remove(0)
        }
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, BackendError> {
        self.query_calls.fetch_add(1, Ordering::Relaxed);
        self.query_requests.lock().unwrap().push(request);
        let mut queued = self.queries.lock().unwrap();
        if queued.is_empty() {
            Err(BackendError::Transport {
                message: "no mock query responses queued".into(),
            })
        } else {
            queued.remove(0)
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_queued_in_order() {
        let mock = MockRagBackend::new();
        mock.push_answer("first");
        mock.push_answer("second");
        let req = QueryRequest {
            question: "q".into(),
            session_id: "s".into(),
            document_ids: None,
        };
        let a = mock.query(req.clone()).await.unwrap();
        let b = mock.query(req).await.unwrap();
        assert_eq!(a.answer.as_deref(), Some("first"));
        assert_eq!(b.answer.as_deref(), Some("second"));
        assert_eq!(mock.query_calls(), 2);
        assert_eq!(mock.query_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_empty_queue_errors() {
        let mock = MockRagBackend::new();
        let result = mock
            .upload(UploadRequest {
                files: Vec::new(),
                session_id: None,
            })
            .await;
        assert!(matches!(result, Err(BackendError::Transport { .. })));
        assert_eq!(mock.upload_calls(), 1);
    }

    #[test]
    fn test_http_backend_uses_configured_base() {
        let api = ApiConfig {
            base_url: "http://rag.example:9000/".into(),
            timeout_secs: 3,
        };
        let backend = HttpRagBackend::new(&api).unwrap();
        assert_eq!(backend.base_url(), "http://rag.example:9000/");
        assert_eq!(backend.name(), "http");
    }
}
