//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, RelayError>`; the status code and body the
//! browser sees are decided here and nowhere else.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::upstream::UpstreamError;

pub const INTERNAL_ERROR_BODY: &str = "An error occurred while processing your request!";
pub const LOGIN_PATH: &str = "/login";

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or rejected credentials. The client decides where to go.
    #[error("Unauthorized")]
    Unauthorized,

    /// Credentials rejected; the client is sent to the login page.
    #[error("Unauthorized")]
    SessionExpired,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not Found")]
    NotFound,

    /// Anything else. Details are logged, never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map an upstream failure on the chat endpoint.
    ///
    /// The chat client handles the redirect itself, so no `Location` is sent.
    pub fn from_chat_upstream(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized => RelayError::Unauthorized,
            other => RelayError::Internal(other.to_string()),
        }
    }

    /// Map an upstream failure on the conversation endpoints.
    pub fn from_session_upstream(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized => RelayError::SessionExpired,
            UpstreamError::NotFound => RelayError::NotFound,
            other => RelayError::Internal(other.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized | RelayError::SessionExpired => StatusCode::UNAUTHORIZED,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            RelayError::SessionExpired => (
                status,
                [(header::LOCATION, LOGIN_PATH)],
                self.to_string(),
            )
                .into_response(),
            RelayError::Internal(ref message) => {
                tracing::error!(error = %message, "Request failed");
                (status, INTERNAL_ERROR_BODY).into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}
