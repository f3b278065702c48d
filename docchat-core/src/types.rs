//! Core type definitions for docchat.
//!
//! Defines the transcript messages, document metadata, and the request and
//! response bodies exchanged with the RAG service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::ValidationError;

/// Represents a participant role in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Sources the backend cited for an assistant answer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl ChatMessage {
    /// Create a new message with an auto-generated id and current timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            citations: Vec::new(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach citations to this message.
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

/// Metadata for one indexed document, produced by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    pub filename: String,
    pub content_type: String,
    pub stored_path: String,
    pub chunk_count: u32,
}

/// Body of a successful `POST /document/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    #[serde(default)]
    pub documents: Vec<DocumentMetadata>,
}

/// Body of `POST /chat/query`.
///
/// `document_ids` is serialized as `null` when no filter applies, which the
/// service reads as "search all documents".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub session_id: String,
    pub document_ids: Option<Vec<String>>,
}

/// One retrieved chunk the service used to ground its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: String,
    pub source: String,
    pub chunk_index: u32,
    pub text_snippet: String,
}

/// Body of a successful `POST /chat/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Extensions the upload form offers in its picker.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "doc", "docx"];

/// A file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl SelectedFile {
    /// Build a staged file from a path on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|_| ValidationError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        if !meta.is_file() {
            return Err(ValidationError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            content_type: guess_content_type(&name).to_string(),
            name,
            size_bytes: meta.len(),
        })
    }

    /// Whether the extension is one the upload form advertises.
    pub fn is_supported(&self) -> bool {
        extension_of(&self.name)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Guess a MIME type from a file name's extension.
pub fn guess_content_type(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}
