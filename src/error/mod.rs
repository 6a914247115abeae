//! Error handling for the relay.
//!
//! Errors are split by where they surface:
//!
//! | Type | Raised by | Ends up as |
//! |------|-----------|------------|
//! | `UpstreamError` | calls to the agent API | mapped to a `RelayError` |
//! | `RelayError` | HTTP handlers | status code and body |
//! | `StreamError` | a running relay task | aborted response body |
//!
//! Per-record decode failures (`SseParseError`) and downstream line parse
//! failures (`FrameParseError`) live next to their parsers and never escape
//! them.

mod relay_error;
mod stream;
mod upstream;

pub use relay_error::{RelayError, INTERNAL_ERROR_BODY, LOGIN_PATH};
pub use stream::StreamError;
pub use upstream::UpstreamError;

/// Result alias used by the HTTP handlers.
pub type RelayResult<T> = Result<T, RelayError>;
