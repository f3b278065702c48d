//! Upload flow controller.
//!
//! Owns file staging and the two halves of an upload: `begin` validates and
//! marks the upload in flight, `complete` applies the service's answer.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{BackendError, Flow, ValidationError};
use crate::filter::merge_document_ids;
use crate::session::{Completion, RequestTicket, SessionState};
use crate::types::{SelectedFile, UploadResponse};

/// Maximum number of files sent in one upload.
pub const MAX_FILES_PER_UPLOAD: usize = 2;

/// Multipart payload for `POST /document/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub files: Vec<SelectedFile>,
    /// Trimmed session id; omitted from the form when empty.
    pub session_id: Option<String>,
}

/// An upload that passed validation and is now in flight.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub ticket: RequestTicket,
    pub request: UploadRequest,
}

/// State transitions for the upload form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadController;

impl UploadController {
    pub fn new() -> Self {
        Self
    }

    /// Replace the staged selection, keeping only the first two files.
    ///
    /// Returns how many files were dropped by the cap.
    pub fn stage_files(&self, state: &mut SessionState, files: Vec<SelectedFile>) -> usize {
        let dropped = files.len().saturating_sub(MAX_FILES_PER_UPLOAD);
        state.selected_files = files.into_iter().take(MAX_FILES_PER_UPLOAD).collect();
        if dropped > 0 {
            debug!(dropped, "selection capped at {MAX_FILES_PER_UPLOAD} files");
        }
        dropped
    }

    /// Stage files from paths on disk.
    ///
    /// Only the first two paths are considered. A missing file sets the upload
    /// error and leaves the previous selection untouched.
    pub fn stage_paths<P: AsRef<Path>>(
        &self,
        state: &mut SessionState,
        paths: &[P],
    ) -> Result<usize, ValidationError> {
        let mut files = Vec::with_capacity(MAX_FILES_PER_UPLOAD);
        for path in paths.iter().take(MAX_FILES_PER_UPLOAD) {
            match SelectedFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(err) => {
                    state.upload_error = Some(err.to_string());
                    return Err(err);
                }
            }
        }
        let dropped = paths.len().saturating_sub(MAX_FILES_PER_UPLOAD);
        self.stage_files(state, files);
        Ok(dropped)
    }

    pub fn clear_selection(&self, state: &mut SessionState) {
        state.selected_files.clear();
    }

    /// Validate the staged selection and mark an upload in flight.
    pub fn begin(&self, state: &mut SessionState) -> Result<PendingUpload, ValidationError> {
        if state.is_uploading {
            return Err(ValidationError::RequestInFlight { what: "upload" });
        }
        if state.selected_files.is_empty() {
            let err = ValidationError::NoFilesSelected;
            state.upload_error = Some(err.to_string());
            return Err(err);
        }

        state.upload_error = None;
        state.chat_error = None;
        state.is_uploading = true;

        let ticket = state.issue_ticket();
        let session_id = Some(ticket.session_id.clone()).filter(|s| !s.is_empty());
        let files = state
            .selected_files
            .iter()
            .take(MAX_FILES_PER_UPLOAD)
            .cloned()
            .collect::<Vec<_>>();
        debug!(files = files.len(), session = ?session_id, "upload started");

        Ok(PendingUpload {
            ticket,
            request: UploadRequest { files, session_id },
        })
    }

    /// Apply the outcome of an upload started with `ticket`.
    pub fn complete(
        &self,
        state: &mut SessionState,
        ticket: &RequestTicket,
        result: Result<UploadResponse, BackendError>,
    ) -> Completion {
        if !state.is_current(ticket) {
            debug!(epoch = ticket.epoch, "discarding stale upload completion");
            return Completion::Discarded;
        }
        state.is_uploading = false;

        match result {
            Ok(response) => {
                let new_ids: Vec<String> = response
                    .documents
                    .iter()
                    .map(|d| d.document_id.clone())
                    .collect();
                state.session_id = response.session_id;
                let added = state.documents.merge(response.documents);
                state.document_filter = merge_document_ids(
                    &state.document_filter,
                    new_ids.iter().map(String::as_str),
                );
                self.clear_selection(state);
                info!(
                    session = %state.session_id,
                    returned = new_ids.len(),
                    added,
                    "documents indexed"
                );
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                state.upload_error = Some(err.user_message(Flow::Upload));
            }
        }
        Completion::Applied
    }
}
