//! Streaming-related error types.
//!
//! Errors that end a relay pipeline after the response headers have already
//! been sent, so they can no longer become an HTTP status.

use thiserror::Error;

/// Errors that stop a relay task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The upstream connection failed mid-stream.
    #[error("Stream connection lost: {message}")]
    ConnectionLost { message: String },

    /// The browser went away. Not a failure.
    #[error("Stream cancelled by consumer")]
    Cancelled,

    /// A frame could not be serialized.
    #[error("Failed to encode frame: {message}")]
    Encode { message: String },
}

impl StreamError {
    /// Whether this is the consumer going away rather than a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
            StreamError::Encode { .. } => "E_STREAM_ENCODE",
        }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Encode {
            message: err.to_string(),
        }
    }
}
