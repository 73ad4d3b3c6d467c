use flowsync_util::http::JsonParseError;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout, or other transport-level failure.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The remote answered with a non-success status. `body` is redacted and truncated.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,
    #[error("cannot build a request URL from '{0}'")]
    InvalidUrl(String),
    #[error(transparent)]
    Json(#[from] JsonParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
