//! Chat workspace: session state wired to a backend.
//!
//! Front-ends drive a `ChatWorkspace` in one of two ways. Sequential callers
//! (REPL, one-shot commands, tests) await `submit_upload` / `submit_question`.
//! Event-loop callers (the TUI) call `begin_*`, hand the pending request to
//! `spawn_*`, and feed the resulting [`FlowEvent`] back into `apply`.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::backend::{HttpRagBackend, RagBackend};
use crate::chat::{ChatController, PendingQuery};
use crate::config::DocChatConfig;
use crate::error::{BackendError, ConfigError, DocChatError, ValidationError};
use crate::session::{Completion, RequestTicket, SessionState};
use crate::types::{QueryResponse, SelectedFile, UploadResponse};
use crate::upload::{PendingUpload, UploadController};

/// Completion of a request that ran in the background.
#[derive(Debug)]
pub enum FlowEvent {
    UploadFinished {
        ticket: RequestTicket,
        result: Result<UploadResponse, BackendError>,
    },
    QueryFinished {
        ticket: RequestTicket,
        result: Result<QueryResponse, BackendError>,
    },
}

/// Run an upload, giving up early if the ticket is cancelled.
pub async fn run_upload(
    backend: Arc<dyn RagBackend>,
    pending: PendingUpload,
) -> (RequestTicket, Result<UploadResponse, BackendError>) {
    let PendingUpload { ticket, request } = pending;
    let result = tokio::select! {
        biased;
        _ = ticket.cancel.cancelled() => Err(BackendError::Cancelled),
        result = backend.upload(request) => result,
    };
    (ticket, result)
}

/// Run a query, giving up early if the ticket is cancelled.
pub async fn run_query(
    backend: Arc<dyn RagBackend>,
    pending: PendingQuery,
) -> (RequestTicket, Result<QueryResponse, BackendError>) {
    let PendingQuery { ticket, request } = pending;
    let result = tokio::select! {
        biased;
        _ = ticket.cancel.cancelled() => Err(BackendError::Cancelled),
        result = backend.query(request) => result,
    };
    (ticket, result)
}

/// Session state plus the backend it talks to.
pub struct ChatWorkspace {
    state: SessionState,
    backend: Arc<dyn RagBackend>,
    uploads: UploadController,
    chat: ChatController,
}

impl ChatWorkspace {
    /// Create a workspace with a fresh session.
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self::with_state(backend, SessionState::new())
    }

    /// Create a workspace around existing state.
    pub fn with_state(backend: Arc<dyn RagBackend>, state: SessionState) -> Self {
        Self {
            state,
            backend,
            uploads: UploadController::new(),
            chat: ChatController::new(),
        }
    }

    /// Create a workspace that talks to the configured HTTP service.
    ///
    /// Fails when the base URL is not an http(s) URL or the HTTP client
    /// cannot be built.
    pub fn connect(config: &DocChatConfig, state: SessionState) -> crate::Result<Self> {
        let base = config.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(DocChatError::Config(ConfigError::Invalid {
                message: format!("api.base_url must be an http(s) URL, got {base:?}"),
            }));
        }
        let backend = HttpRagBackend::new(&config.api)?;
        debug!(base_url = %base, session_id = %state.session_id, "workspace connected");
        Ok(Self::with_state(Arc::new(backend), state))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn backend(&self) -> Arc<dyn RagBackend> {
        Arc::clone(&self.backend)
    }

    /// Stage files from disk, keeping the first two.
    pub fn stage_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, ValidationError> {
        self.uploads.stage_paths(&mut self.state, paths)
    }

    /// Stage already-built file entries, keeping the first two.
    pub fn stage_files(&mut self, files: Vec<SelectedFile>) -> usize {
        self.uploads.stage_files(&mut self.state, files)
    }

    pub fn clear_selection(&mut self) {
        self.uploads.clear_selection(&mut self.state);
    }

    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.state.set_session_id(session_id);
    }

    pub fn set_document_filter(&mut self, filter: impl Into<String>) {
        self.state.set_document_filter(filter);
    }

    pub fn set_question_input(&mut self, text: impl Into<String>) {
        self.state.set_question_input(text);
    }

    /// Start a fresh session, cancelling anything in flight.
    pub fn new_session(&mut self) {
        self.state.reset();
    }

    pub fn begin_upload(&mut self) -> Result<PendingUpload, ValidationError> {
        self.uploads.begin(&mut self.state)
    }

    /// Begin a query for the text in the question input.
    pub fn begin_question(&mut self) -> Result<Option<PendingQuery>, ValidationError> {
        self.chat.begin(&mut self.state)
    }

    /// Begin a query for `text`.
    pub fn begin_question_with(
        &mut self,
        text: &str,
    ) -> Result<Option<PendingQuery>, ValidationError> {
        self.chat.begin_with(&mut self.state, text)
    }

    /// Run an upload on the runtime and report its completion on `tx`.
    pub fn spawn_upload(
        &self,
        pending: PendingUpload,
        tx: mpsc::UnboundedSender<FlowEvent>,
    ) -> JoinHandle<()> {
        let backend = self.backend();
        tokio::spawn(async move {
            let (ticket, result) = run_upload(backend, pending).await;
            if tx.send(FlowEvent::UploadFinished { ticket, result }).is_err() {
                debug!("upload finished after receiver closed");
            }
        })
    }

    /// Run a query on the runtime and report its completion on `tx`.
    pub fn spawn_query(
        &self,
        pending: PendingQuery,
        tx: mpsc::UnboundedSender<FlowEvent>,
    ) -> JoinHandle<()> {
        let backend = self.backend();
        tokio::spawn(async move {
            let (ticket, result) = run_query(backend, pending).await;
            if tx.send(FlowEvent::QueryFinished { ticket, result }).is_err() {
                debug!("query finished after receiver closed");
            }
        })
    }

    /// Apply a background completion to the state.
    pub fn apply(&mut self, event: FlowEvent) -> Completion {
        match event {
            FlowEvent::UploadFinished { ticket, result } => {
                self.uploads.complete(&mut self.state, &ticket, result)
            }
            FlowEvent::QueryFinished { ticket, result } => {
                self.chat.complete(&mut self.state, &ticket, result)
            }
        }
    }

    /// Upload the staged files and wait for the outcome.
    pub async fn submit_upload(&mut self) -> Result<Completion, ValidationError> {
        let pending = self.begin_upload()?;
        let (ticket, result) = run_upload(self.backend(), pending).await;
        Ok(self.uploads.complete(&mut self.state, &ticket, result))
    }

    /// Ask `text` and wait for the answer.
    ///
    /// Returns `Ok(None)` when the text was blank and nothing was sent.
    pub async fn submit_question(
        &mut self,
        text: &str,
    ) -> Result<Option<Completion>, ValidationError> {
        let Some(pending) = self.begin_question_with(text)? else {
            return Ok(None);
        };
        let (ticket, result) = run_query(self.backend(), pending).await;
        Ok(Some(self.chat.complete(&mut self.state, &ticket, result)))
    }
}
