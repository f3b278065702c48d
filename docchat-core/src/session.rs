//! Session state holder.
//!
//! `SessionState` is the single in-memory state container for one client.
//! Controllers mutate it through small transition methods; renderers only
//! read it. Every request the controllers start is tagged with a
//! [`RequestTicket`] so that a completion arriving after a reset, or after
//! its token was cancelled, can be recognised and dropped.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::documents::DocumentCollection;
use crate::types::{ChatMessage, SelectedFile};

/// Generate a fresh opaque session identifier.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Identity of an in-flight request, captured when it was submitted.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    /// Session epoch at submit time. Reset bumps the epoch.
    pub epoch: u64,
    /// Session id sent with the request.
    pub session_id: String,
    /// Cancelled when the session is reset.
    pub cancel: CancellationToken,
}

impl RequestTicket {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// What happened to a completed request's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied to the state.
    Applied,
    /// The session moved on; the result was dropped.
    Discarded,
}

/// All client-side state for one chat session.
#[derive(Debug)]
pub struct SessionState {
    pub session_id: String,
    pub transcript: Vec<ChatMessage>,
    /// Comma-separated document-id filter, as the user sees it.
    pub document_filter: String,
    pub documents: DocumentCollection,
    pub selected_files: Vec<SelectedFile>,
    /// Pending question text.
    pub question_input: String,
    pub upload_error: Option<String>,
    pub chat_error: Option<String>,
    pub is_uploading: bool,
    pub is_loading: bool,
    epoch: u64,
    cancel: CancellationToken,
}

impl SessionState {
    /// Create a state with a freshly generated session id.
    pub fn new() -> Self {
        Self::with_session_id(new_session_id())
    }

    /// Create a state bound to an existing session id.
    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            transcript: Vec::new(),
            document_filter: String::new(),
            documents: DocumentCollection::new(),
            selected_files: Vec::new(),
            question_input: String::new(),
            upload_error: None,
            chat_error: None,
            is_uploading: false,
            is_loading: false,
            epoch: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Session id trimmed for the wire. May be empty.
    pub fn trimmed_session_id(&self) -> &str {
        self.session_id.trim()
    }

    /// Replace the session id (direct user edit).
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    pub fn set_document_filter(&mut self, filter: impl Into<String>) {
        self.document_filter = filter.into();
    }

    pub fn set_question_input(&mut self, text: impl Into<String>) {
        self.question_input = text.into();
    }

    /// Issue a ticket for a request starting now.
    pub fn issue_ticket(&self) -> RequestTicket {
        RequestTicket {
            epoch: self.epoch,
            session_id: self.trimmed_session_id().to_string(),
            cancel: self.cancel.child_token(),
        }
    }

    /// Whether a completion for `ticket` should still be applied.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.epoch == self.epoch && !ticket.is_cancelled()
    }

    /// Start a fresh session.
    ///
    /// Cancels every in-flight request, generates a new session id, and
    /// clears transcript, documents, filter, errors, file selection, and
    /// pending input.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        let previous = std::mem::take(&mut self.session_id);
        let mut fresh = new_session_id();
        while fresh == previous {
            fresh = new_session_id();
        }
        let epoch = self.epoch.wrapping_add(1);
        *self = Self::with_session_id(fresh);
        self.epoch = epoch;
        tracing::debug!(epoch, "session reset");
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
