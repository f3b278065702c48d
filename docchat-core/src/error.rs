//! Error types for the docchat core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the backend boundary, input validation, and configuration.

use std::path::PathBuf;

/// Generic inline message for a failed upload with an empty response body.
pub const UPLOAD_FAILED_FALLBACK: &str = "Failed to upload documents.";

/// Generic inline message for an upload that failed without a usable cause.
pub const UPLOAD_UNAVAILABLE_FALLBACK: &str = "Unable to upload documents.";

/// Generic inline message for a failed query with an empty response body.
pub const QUERY_FAILED_FALLBACK: &str = "Unable to reach the RAG service.";

/// Generic inline message for a query that failed without a usable cause.
pub const QUERY_UNAVAILABLE_FALLBACK: &str = "Something went wrong.";

/// Top-level error for setting up a workspace against a live service.
#[derive(Debug, thiserror::Error)]
pub enum DocChatError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the remote RAG service boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status. `body` is the raw text.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("Response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Request was cancelled")]
    Cancelled,
}

/// Which flow an error is being surfaced for. The generic fallbacks differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Upload,
    Query,
}

impl BackendError {
    /// Text to show inline in the UI for this error.
    ///
    /// A non-2xx response shows its body verbatim, or the flow's
    /// "failed" fallback when the body is empty. Other failures show their
    /// own message, or the flow's "unavailable" fallback when there is none.
    pub fn user_message(&self, flow: Flow) -> String {
        match self {
            BackendError::Status { body, .. } => {
                if body.is_empty() {
                    match flow {
                        Flow::Upload => UPLOAD_FAILED_FALLBACK.to_string(),
                        Flow::Query => QUERY_FAILED_FALLBACK.to_string(),
                    }
                } else {
                    body.clone()
                }
            }
            BackendError::Transport { message } | BackendError::ResponseParse { message }
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => match flow {
                Flow::Upload => UPLOAD_UNAVAILABLE_FALLBACK.to_string(),
                Flow::Query => QUERY_UNAVAILABLE_FALLBACK.to_string(),
            },
        }
    }
}

/// Errors detected locally before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Select up to two documents to upload.")]
    NoFilesSelected,

    #[error("Please provide a session ID before asking a question.")]
    MissingSessionId,

    #[error("A {what} request is already in flight")]
    RequestInFlight { what: &'static str },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

/// A type alias for results using the top-level `DocChatError`.
pub type Result<T> = std::result::Result<T, DocChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_shows_body() {
        let err = BackendError::Status {
            status: 400,
            body: "bad file type".into(),
        };
        assert_eq!(err.user_message(Flow::Upload), "bad file type");
    }

    #[test]
    fn test_status_error_empty_body_falls_back_per_flow() {
        let err = BackendError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.user_message(Flow::Upload), UPLOAD_FAILED_FALLBACK);
        assert_eq!(err.user_message(Flow::Query), QUERY_FAILED_FALLBACK);
    }

    #[test]
    fn test_transport_error_uses_own_message() {
        let err = BackendError::Transport {
            message: "connection refused".into(),
        };
        assert_eq!(err.user_message(Flow::Query), "connection refused");
    }

    #[test]
    fn test_cancelled_uses_generic_fallback() {
        assert_eq!(
            BackendError::Cancelled.user_message(Flow::Query),
            QUERY_UNAVAILABLE_FALLBACK
        );
        assert_eq!(
            BackendError::Cancelled.user_message(Flow::Upload),
            UPLOAD_UNAVAILABLE_FALLBACK
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::NoFilesSelected.to_string(),
            "Select up to two documents to upload."
        );
        assert_eq!(
            ValidationError::MissingSessionId.to_string(),
            "Please provide a session ID before asking a question."
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = DocChatError::from(ConfigError::Invalid {
            message: "api.base_url is empty".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: api.base_url is empty"
        );
    }

    #[test]
    fn test_error_display_backend() {
        let err = DocChatError::Backend(BackendError::Transport {
            message: "dns failure".into(),
        });
        assert_eq!(err.to_string(), "Backend error: Request failed: dns failure");
    }
}
