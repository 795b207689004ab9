//! Library error type
//!
//! Three groups matter to callers: malformed model output, missing local
//! resources (with the command that fixes them), and everything else.
//! Per-item failures inside a fan-out never surface here; they are turned
//! into fallback values where they happen.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model answered, but no usable JSON object could be found.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Index not found at {}. Run: {remediation}", path.display())]
    IndexNotFound { path: PathBuf, remediation: String },

    #[error("{resource} not found at {}. {remediation}", path.display())]
    MissingResource {
        resource: &'static str,
        path: PathBuf,
        remediation: String,
    },

    #[error("{0}")]
    InvalidImage(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("GEMINI_API_KEY not configured")]
    ModelNotConfigured,

    #[error("model call failed: {0}")]
    Model(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    /// True for errors caused by the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidImage(_) | Error::BadRequest(_))
    }
}
