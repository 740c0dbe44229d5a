use blendjobs_parser::BlendError;
use thiserror::Error;

pub type Result<T, E = HandlerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid object URI '{0}'")]
    InvalidUri(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("failed to fetch {uri}: {message}")]
    Fetch { uri: String, message: String },
    #[error(transparent)]
    Scan(#[from] BlendError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    pub(crate) fn fetch(uri: impl ToString, err: impl std::fmt::Display) -> Self {
        HandlerError::Fetch {
            uri: uri.to_string(),
            message: err.to_string(),
        }
    }

    /// The scan error underneath, if this failure came from the parser.
    pub fn as_scan_error(&self) -> Option<&BlendError> {
        match self {
            HandlerError::Scan(e) => Some(e),
            _ => None,
        }
    }
}
