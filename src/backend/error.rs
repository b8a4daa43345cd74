use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the remote authentication API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a non-success status.
    #[error("{path} responded with {status}")]
    Status { path: String, status: StatusCode },
    /// The API answered with a success status but the body is unusable.
    #[error("invalid response from {path}: {reason}")]
    InvalidResponse { path: String, reason: String },
    /// Input rejected locally before any request was sent.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
    /// The client cannot be built from the given settings.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Upstream HTTP status, when the API answered at all.
    #[must_use]
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
