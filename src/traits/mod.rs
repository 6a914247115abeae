//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP calls to the upstream agent API
//! - [`FrameSink`] - Destination for encoded downstream frames

pub mod http;
pub mod sink;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use sink::{BodyChunk, FrameSink, SinkClosed};
