//! # docchat core
//!
//! Core library for the docchat client.
//! Provides the session state holder, the upload and chat flow controllers,
//! the RAG service backend, configuration, and view models for front-ends.

pub mod backend;
pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod filter;
pub mod session;
pub mod types;
pub mod upload;
pub mod view;
pub mod workspace;

// Re-export commonly used types at the crate root.
pub use backend::{HttpRagBackend, MockRagBackend, RagBackend};
pub use chat::{ChatController, NO_ANSWER_FALLBACK, PendingQuery};
pub use config::{ConfigOverrides, DocChatConfig, load_config};
pub use documents::DocumentCollection;
pub use error::{BackendError, ConfigError, DocChatError, Result, ValidationError};
pub use session::{Completion, RequestTicket, SessionState};
pub use types::{
    ChatMessage, Citation, DocumentMetadata, QueryRequest, QueryResponse, Role, SelectedFile,
    UploadResponse,
};
pub use upload::{MAX_FILES_PER_UPLOAD, PendingUpload, UploadController, UploadRequest};
pub use workspace::{ChatWorkspace, FlowEvent};
