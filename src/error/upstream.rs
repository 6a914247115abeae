//! Errors from calls to the upstream agent API.

use thiserror::Error;

use crate::traits::HttpError;

/// Upstream request failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The bearer token was rejected (HTTP 401).
    #[error("Authentication failed")]
    Unauthorized,

    /// The requested resource does not exist (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// Any other non-success status.
    #[error("Upstream request failed with status {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error("Upstream transport error: {0}")]
    Transport(HttpError),

    /// The response body was not the expected JSON.
    #[error("Invalid upstream response: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Classify a non-success response.
    ///
    /// The upstream reports errors as `{"message": ...}`; any other body is
    /// used verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => UpstreamError::Unauthorized,
            404 => UpstreamError::NotFound,
            _ => {
                let message = serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| {
                        if body.is_empty() {
                            format!("API request failed with status {}", status)
                        } else {
                            body.to_string()
                        }
                    });
                UpstreamError::Server { status, message }
            }
        }
    }

    /// Whether the caller has to log in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, UpstreamError::Unauthorized)
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            UpstreamError::Unauthorized => "E_UPSTREAM_AUTH",
            UpstreamError::NotFound => "E_UPSTREAM_NOT_FOUND",
            UpstreamError::Server { .. } => "E_UPSTREAM_STATUS",
            UpstreamError::Transport(_) => "E_UPSTREAM_TRANSPORT",
            UpstreamError::Json(_) => "E_UPSTREAM_JSON",
        }
    }
}

impl From<HttpError> for UpstreamError {
    fn from(err: HttpError) -> Self {
        match err {
            // Streaming requests report non-success statuses as errors
            HttpError::ServerError { status, message } => Self::from_status(status, &message),
            other => UpstreamError::Transport(other),
        }
    }
}
