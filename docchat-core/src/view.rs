//! View models for the presentation layer.
//!
//! Pure functions from `SessionState` to the text a front-end shows. The TUI
//! widgets and the REPL printer both render from these, so labels and
//! formatting stay identical across front-ends.

use crate::session::SessionState;
use crate::types::{ChatMessage, DocumentMetadata, Role, SelectedFile};

/// Placeholder shown while a query is outstanding. Never stored.
pub const PENDING_PLACEHOLDER: &str = "Thinking…";
pub const EMPTY_TRANSCRIPT_TITLE: &str = "No messages yet";
pub const EMPTY_TRANSCRIPT_HINT: &str =
    "Share a question about your uploaded documents to get started.";
pub const IDLE_STATUS: &str = "Responses stay within this session's context.";
pub const LOADING_STATUS: &str = "Awaiting response…";

/// Characters of the document id shown next to its file name.
const SHORT_ID_LEN: usize = 8;

/// One bubble in the transcript view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
    pub is_pending: bool,
    /// Local `HH:MM:SS` creation time; `None` for the pending placeholder.
    pub timestamp: Option<String>,
    /// Short "source #chunk" labels for cited chunks.
    pub sources: Vec<String>,
}

impl From<&ChatMessage> for MessageView {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
            is_pending: false,
            timestamp: Some(
                msg.timestamp
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
            ),
            sources: msg
                .citations
                .iter()
                .map(|c| format!("{} #{}", c.source, c.chunk_index))
                .collect(),
        }
    }
}

/// The transcript as the chat window shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptView {
    Empty { title: &'static str, hint: &'static str },
    Messages(Vec<MessageView>),
}

/// Build the transcript view, appending the pending placeholder while loading.
pub fn transcript_view(state: &SessionState) -> TranscriptView {
    if state.transcript.is_empty() && !state.is_loading {
        return TranscriptView::Empty {
            title: EMPTY_TRANSCRIPT_TITLE,
            hint: EMPTY_TRANSCRIPT_HINT,
        };
    }
    let mut messages: Vec<MessageView> = state.transcript.iter().map(MessageView::from).collect();
    if state.is_loading {
        messages.push(MessageView {
            role: Role::Assistant,
            content: PENDING_PLACEHOLDER.to_string(),
            is_pending: true,
            timestamp: None,
            sources: Vec::new(),
        });
    }
    TranscriptView::Messages(messages)
}

/// `"1 chunk"` / `"5 chunks"`.
pub fn chunk_label(count: u32) -> String {
    format!("{count} chunk{}", if count == 1 { "" } else { "s" })
}

/// `"report.pdf · 5 chunks · application/pdf"`.
pub fn document_summary(doc: &DocumentMetadata) -> String {
    format!(
        "{} · {} · {}",
        doc.filename,
        chunk_label(doc.chunk_count),
        doc.content_type
    )
}

/// First eight characters of a document id.
pub fn short_id(document_id: &str) -> &str {
    match document_id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &document_id[..idx],
        None => document_id,
    }
}

/// One row of the indexed-documents list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub document_id: String,
    pub short_id: String,
    pub summary: String,
}

/// The indexed-documents list.
pub fn document_rows(state: &SessionState) -> Vec<DocumentRow> {
    state
        .documents
        .iter()
        .map(|doc| DocumentRow {
            document_id: doc.document_id.clone(),
            short_id: short_id(&doc.document_id).to_string(),
            summary: document_summary(doc),
        })
        .collect()
}

/// `"2 files indexed"`, or `None` when nothing has been indexed.
pub fn indexed_count_label(state: &SessionState) -> Option<String> {
    match state.documents.len() {
        0 => None,
        1 => Some("1 file indexed".to_string()),
        n => Some(format!("{n} files indexed")),
    }
}

/// A staged file with its size in whole KB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFileRow {
    pub name: String,
    pub size_label: String,
}

impl From<&SelectedFile> for StagedFileRow {
    fn from(file: &SelectedFile) -> Self {
        Self {
            name: file.name.clone(),
            size_label: format!("{:.0} KB", file.size_bytes as f64 / 1024.0),
        }
    }
}

/// Everything the upload form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFormView {
    pub staged: Vec<StagedFileRow>,
    pub upload_label: &'static str,
    pub upload_enabled: bool,
    pub clear_enabled: bool,
    pub error: Option<String>,
    pub indexed_label: Option<String>,
}

pub fn upload_form_view(state: &SessionState) -> UploadFormView {
    UploadFormView {
        staged: state.selected_files.iter().map(StagedFileRow::from).collect(),
        upload_label: if state.is_uploading {
            "Uploading…"
        } else {
            "Upload & index"
        },
        upload_enabled: !state.is_uploading,
        clear_enabled: !state.selected_files.is_empty() && !state.is_uploading,
        error: state.upload_error.clone(),
        indexed_label: indexed_count_label(state),
    }
}

/// Everything the question form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFormView {
    pub input: String,
    pub document_filter: String,
    pub status: &'static str,
    pub send_label: &'static str,
    pub send_enabled: bool,
    pub error: Option<String>,
}

pub fn question_form_view(state: &SessionState) -> QuestionFormView {
    QuestionFormView {
        input: state.question_input.clone(),
        document_filter: state.document_filter.clone(),
        status: if state.is_loading {
            LOADING_STATUS
        } else {
            IDLE_STATUS
        },
        send_label: if state.is_loading {
            "Sending…"
        } else {
            "Send question"
        },
        send_enabled: !state.is_loading,
        error: state.chat_error.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Citation;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn report() -> DocumentMetadata {
        DocumentMetadata {
            document_id: "d1".into(),
            filename: "report.pdf".into(),
            content_type: "application/pdf".into(),
            stored_path: "/x".into(),
            chunk_count: 5,
        }
    }

    #[test]
    fn test_document_summary() {
        assert_eq!(
            document_summary(&report()),
            "report.pdf · 5 chunks · application/pdf"
        );
        let mut single = report();
        single.chunk_count = 1;
        assert_eq!(document_summary(&single), "report.pdf · 1 chunk · application/pdf");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("d1"), "d1");
    }

    #[test]
    fn test_empty_transcript_view() {
        let state = SessionState::new();
        assert_eq!(
            transcript_view(&state),
            TranscriptView::Empty {
                title: "No messages yet",
                hint: EMPTY_TRANSCRIPT_HINT,
            }
        );
    }

    #[test]
    fn test_pending_placeholder_not_stored() {
        let mut state = SessionState::new();
        state.transcript.push(ChatMessage::user("q"));
        state.is_loading = true;
        let TranscriptView::Messages(messages) = transcript_view(&state) else {
            panic!("expected messages");
        };
        assert_eq!(messages.len(), 2);
        assert!(messages[1].is_pending);
        assert_eq!(messages[1].content, "Thinking…");
        assert_eq!(state.transcript.len(), 1);
    }

    #[test]
    fn test_loading_with_empty_transcript_shows_placeholder() {
        let mut state = SessionState::new();
        state.is_loading = true;
        assert!(matches!(transcript_view(&state), TranscriptView::Messages(m) if m.len() == 1));
    }

    #[test]
    fn test_message_sources() {
        let msg = ChatMessage::assistant("a").with_citations(vec![Citation {
            document_id: "d1".into(),
            source: "report.pdf".into(),
            chunk_index: 3,
            text_snippet: "...".into(),
        }]);
        assert_eq!(MessageView::from(&msg).sources, vec!["report.pdf #3"]);
    }

    #[test]
    fn test_upload_form_labels() {
        let mut state = SessionState::new();
        state.selected_files.push(SelectedFile {
            path: PathBuf::from("a.pdf"),
            name: "a.pdf".into(),
            size_bytes: 10 * 1024,
            content_type: "application/pdf".into(),
        });
        let view = upload_form_view(&state);
        assert_eq!(view.upload_label, "Upload & index");
        assert!(view.clear_enabled);
        assert_eq!(view.staged[0].size_label, "10 KB");
        assert_eq!(view.indexed_label, None);

        state.is_uploading = true;
        state.documents.upsert(report());
        let view = upload_form_view(&state);
        assert_eq!(view.upload_label, "Uploading…");
        assert!(!view.clear_enabled);
        assert!(!view.upload_enabled);
        assert_eq!(view.indexed_label.as_deref(), Some("1 file indexed"));
    }

    #[test]
    fn test_question_form_labels() {
        let mut state = SessionState::new();
        let view = question_form_view(&state);
        assert_eq!(view.send_label, "Send question");
        assert_eq!(view.status, IDLE_STATUS);

        state.is_loading = true;
        state.chat_error = Some("boom".into());
        let view = question_form_view(&state);
        assert_eq!(view.send_label, "Sending…");
        assert_eq!(view.status, "Awaiting response…");
        assert_eq!(view.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_document_rows() {
        let mut state = SessionState::new();
        state.documents.upsert(report());
        let rows = document_rows(&state);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "report.pdf · 5 chunks · application/pdf");
        assert_eq!(rows[0].short_id, "d1");
    }
}
