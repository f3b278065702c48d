//! Chat flow controller.
//!
//! `begin` turns the pending question into an optimistic user message and a
//! query request; `complete` appends the assistant answer or surfaces the
//! error. The user's message is never rolled back.

use tracing::{debug, info, warn};

use crate::error::{BackendError, Flow, ValidationError};
use crate::filter::request_document_ids;
use crate::session::{Completion, RequestTicket, SessionState};
use crate::types::{ChatMessage, QueryRequest, QueryResponse};

/// Assistant text used when the service returns no usable answer.
pub const NO_ANSWER_FALLBACK: &str = "I wasn't able to find an answer in your documents.";

/// A query that passed validation and is now in flight.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: RequestTicket,
    pub request: QueryRequest,
}

/// State transitions for the question form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatController;

impl ChatController {
    pub fn new() -> Self {
        Self
    }

    /// Submit the question currently held in `state.question_input`.
    pub fn begin(&self, state: &mut SessionState) -> Result<Option<PendingQuery>, ValidationError> {
        let text = state.question_input.clone();
        self.begin_with(state, &text)
    }

    /// Submit `text` as a question.
    ///
    /// Blank text is a silent no-op (`Ok(None)`). A blank session id sets the
    /// chat error and sends nothing.
    pub fn begin_with(
        &self,
        state: &mut SessionState,
        text: &str,
    ) -> Result<Option<PendingQuery>, ValidationError> {
        let question = text.trim();
        if question.is_empty() {
            return Ok(None);
        }
        if state.is_loading {
            return Err(ValidationError::RequestInFlight { what: "query" });
        }
        if state.trimmed_session_id().is_empty() {
            let err = ValidationError::MissingSessionId;
            state.chat_error = Some(err.to_string());
            return Err(err);
        }

        state.chat_error = None;
        state.transcript.push(ChatMessage::user(question));
        state.question_input.clear();
        state.is_loading = true;

        let ticket = state.issue_ticket();
        let request = QueryRequest {
            question: question.to_string(),
            session_id: ticket.session_id.clone(),
            document_ids: request_document_ids(&state.document_filter),
        };
        debug!(
            session = %request.session_id,
            filtered = request.document_ids.as_ref().map(Vec::len),
            "query started"
        );
        Ok(Some(PendingQuery { ticket, request }))
    }

    /// Apply the outcome of a query started with `ticket`.
    pub fn complete(
        &self,
        state: &mut SessionState,
        ticket: &RequestTicket,
        result: Result<QueryResponse, BackendError>,
    ) -> Completion {
        if !state.is_current(ticket) {
            debug!(epoch = ticket.epoch, "discarding stale query completion");
            return Completion::Discarded;
        }
        state.is_loading = false;

        match result {
            Ok(response) => {
                let answer = response
                    .answer
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .unwrap_or(NO_ANSWER_FALLBACK);
                info!(citations = response.citations.len(), "answer received");
                state
                    .transcript
                    .push(ChatMessage::assistant(answer).with_citations(response.citations));
            }
            Err(err) => {
                warn!(error = %err, "query failed");
                state.chat_error = Some(err.user_message(Flow::Query));
            }
        }
        Completion::Applied
    }
}
